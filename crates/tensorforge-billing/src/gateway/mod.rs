//! Payment provider clients.

mod razorpay;

pub use razorpay::{RazorpayClient, RazorpayCustomer, RazorpayOrder, RazorpaySubscription};
