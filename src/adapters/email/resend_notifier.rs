//! Resend implementation of OrderNotifier.
//!
//! Sends the order confirmation through Resend's `/emails` endpoint. The
//! body is plain text; the storefront's transactional mail deliberately has
//! no template engine behind it.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::EmailConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{OrderConfirmation, OrderNotifier};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Clone)]
pub struct ResendNotifier {
    config: EmailConfig,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: String,
    text: String,
}

impl ResendNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn render_body(order: &OrderConfirmation) -> String {
        let mut body = String::new();
        match &order.customer_name {
            Some(name) => body.push_str(&format!("Hi {},\n\n", name)),
            None => body.push_str("Hi,\n\n"),
        }
        body.push_str(&format!(
            "Thanks for your order! Payment for order {} has been received.\n\n",
            order.order_id
        ));
        for line in &order.lines {
            body.push_str(&format!(
                "  {} x{}  {}\n",
                line.title,
                line.quantity,
                format_amount(line.unit_price_cents * i64::from(line.quantity), &order.currency)
            ));
        }
        body.push_str(&format!(
            "\nTotal: {}\n",
            format_amount(order.total_cents, &order.currency)
        ));
        body
    }
}

fn format_amount(cents: i64, currency: &str) -> String {
    format!("{}.{:02} {}", cents / 100, (cents % 100).abs(), currency)
}

#[async_trait]
impl OrderNotifier for ResendNotifier {
    async fn send_confirmation(&self, order: &OrderConfirmation) -> Result<(), DomainError> {
        let request = SendEmailRequest {
            from: self.config.from_header(),
            to: [order.customer_email.as_str()],
            subject: format!("Order confirmation {}", order.order_id),
            text: Self::render_body(order),
        };

        let response = self
            .http_client
            .post(RESEND_API_URL)
            .bearer_auth(&self.config.resend_api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::NotificationError,
                    format!("Resend request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::NotificationError,
                format!("Resend returned {}: {}", status, body),
            ));
        }

        tracing::info!(order_id = %order.order_id, "order confirmation sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::OrderId;
    use crate::ports::OrderLine;

    fn confirmation() -> OrderConfirmation {
        OrderConfirmation {
            order_id: OrderId::new(),
            customer_email: "customer@example.com".to_string(),
            customer_name: Some("Ada".to_string()),
            total_cents: 12_550,
            currency: "USD".to_string(),
            lines: vec![
                OrderLine {
                    title: "Walnut desk organizer".to_string(),
                    quantity: 2,
                    unit_price_cents: 4_525,
                },
                OrderLine {
                    title: "Brass pen".to_string(),
                    quantity: 1,
                    unit_price_cents: 3_500,
                },
            ],
        }
    }

    #[test]
    fn body_lists_lines_and_total() {
        let body = ResendNotifier::render_body(&confirmation());
        assert!(body.starts_with("Hi Ada,"));
        assert!(body.contains("Walnut desk organizer x2  90.50 USD"));
        assert!(body.contains("Brass pen x1  35.00 USD"));
        assert!(body.contains("Total: 125.50 USD"));
    }

    #[test]
    fn anonymous_customer_gets_a_plain_greeting() {
        let mut order = confirmation();
        order.customer_name = None;
        assert!(ResendNotifier::render_body(&order).starts_with("Hi,\n"));
    }

    #[test]
    fn amounts_format_with_two_decimals() {
        assert_eq!(format_amount(5, "EUR"), "0.05 EUR");
        assert_eq!(format_amount(100, "EUR"), "1.00 EUR");
    }
}
