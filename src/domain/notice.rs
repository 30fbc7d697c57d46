use super::payment::PaymentRecord;
use super::quote::OrderDetails;
use serde::Serialize;

/// Payment receipt sent once funds are held in escrow.
///
/// Fields other than the booking id are optional because a callback may arrive in a
/// session that never loaded the order details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub client_email: Option<String>,
    pub client_name: Option<String>,
    pub creator_name: Option<String>,
    pub service_type: Option<String>,
    pub event_date: Option<String>,
    pub location: Option<String>,
    pub booking_id: String,
    pub total_amount: Option<String>,
    pub platform_fee: Option<String>,
    pub gst: Option<String>,
    pub final_amount: Option<String>,
    pub transaction_id: Option<String>,
}

impl PaymentReceipt {
    pub fn new(
        record: &PaymentRecord,
        order: Option<&OrderDetails>,
        client_email: Option<&str>,
    ) -> Self {
        let client_name = client_email.map(|email| {
            email
                .split('@')
                .next()
                .filter(|name| !name.is_empty())
                .unwrap_or("Client")
                .to_string()
        });

        Self {
            client_email: client_email.map(str::to_string),
            client_name,
            creator_name: order.map(|o| o.creator_name.clone()),
            service_type: order.map(|o| o.project_type.clone()),
            event_date: order.map(|o| o.event_date.clone()),
            location: order.map(|o| o.location.clone()),
            booking_id: record.request_id.clone(),
            total_amount: order.map(|o| format_rupees(o.quote.base)),
            platform_fee: order.map(|o| format_rupees(o.quote.platform_fee)),
            gst: order.map(|o| format_rupees(o.quote.gst)),
            final_amount: Some(format_rupees(
                order.map(|o| o.quote.total).unwrap_or(record.amount),
            )),
            transaction_id: record.gateway_payment_id.clone(),
        }
    }
}

/// Notifications emitted on successful transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentNotice {
    Escrowed(PaymentReceipt),
    Released(PaymentRecord),
}

/// Formats a major-unit amount with Indian digit grouping, e.g. `₹1,23,450`.
pub fn format_rupees(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{}", digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("₹{},{}", groups.join(","), tail)
}
