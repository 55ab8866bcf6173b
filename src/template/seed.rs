//! Built-in system templates inserted into empty storage

use chrono::{Duration, Utc};

use super::repository::TemplateRepository;
use super::types::{
    EmailTemplate, PreviewDataset, TemplateResult, TemplateVariable, VariableInput, VariableType,
};

struct SeedVariable {
    key: &'static str,
    name: &'static str,
    var_type: VariableType,
    default_value: String,
}

struct SeedTemplate {
    name: &'static str,
    description: &'static str,
    body: &'static str,
    variables: Vec<SeedVariable>,
}

fn var(key: &'static str, name: &'static str, var_type: VariableType, default_value: impl Into<String>) -> SeedVariable {
    SeedVariable {
        key,
        name,
        var_type,
        default_value: default_value.into(),
    }
}

const WELCOME_BODY: &str = r#"<h2>Welcome to {{.companyName}}!</h2>
<p>Hello {{.firstName}},</p>
<p>Thank you for joining us. We're excited to have you on board!</p>
<p>You can log in to your account using <a href="{{.loginLink}}">this link</a>.</p>
<p>If you have any questions, please don't hesitate to reach out to our support team.</p>
<p>Best regards,<br>The {{.companyName}} Team</p>"#;

const ORDER_BODY: &str = r#"<h2>Order Confirmation</h2>
<p>Dear {{.firstName}},</p>
<p>Thank you for your order! We're processing it now.</p>
<p><strong>Order #{{.orderNumber}}</strong> placed on {{.orderDate}}</p>
<p>Your items will be shipped to:</p>
<p>{{.deliveryAddress}}</p>
<p>We'll send you another email when your package ships.</p>
<p>Thank you for shopping with us!</p>"#;

const PASSWORD_RESET_BODY: &str = r#"<h2>Password Reset Request</h2>
<p>Hello {{.firstName}},</p>
<p>We received a request to reset your password. If you didn't make this request, please ignore this email.</p>
<p>To reset your password, click on the link below:</p>
<p><a href="{{.resetLink}}">Reset Your Password</a></p>
<p>This link will expire in 24 hours.</p>
<p>If you have any questions, please contact our support team.</p>
<p>Thank you,<br>The {{.companyName}} Team</p>"#;

const SHIPPING_BODY: &str = r#"<h2>Your Order Has Shipped!</h2>
<p>Dear {{.firstName}},</p>
<p>Great news! Your order #{{.orderNumber}} has shipped and is on its way to you.</p>
<p><strong>Tracking Information:</strong></p>
<p>Tracking Number: {{.trackingNumber}}<br>
Carrier: {{.carrier}}</p>
<p>You can track your package here: <a href="{{.trackingLink}}">Track Package</a></p>
<p>Expected delivery date: {{.deliveryDate}}</p>
<p>Thank you for your business!</p>
<p>Best regards,<br>The {{.companyName}} Team</p>"#;

fn system_templates() -> Vec<SeedTemplate> {
    let today = Utc::now().date_naive();
    let delivery = today + Duration::days(5);

    vec![
        SeedTemplate {
            name: "Welcome Email",
            description: "Default welcome email for new users",
            body: WELCOME_BODY,
            variables: vec![
                var("firstName", "First Name", VariableType::Text, "John"),
                var("lastName", "Last Name", VariableType::Text, "Doe"),
                var("companyName", "Company Name", VariableType::Text, "Acme Inc"),
                var("loginLink", "Login Link", VariableType::Url, "https://example.com/login"),
            ],
        },
        SeedTemplate {
            name: "Order Confirmation",
            description: "Default order confirmation email",
            body: ORDER_BODY,
            variables: vec![
                var("firstName", "First Name", VariableType::Text, "John"),
                var("orderNumber", "Order Number", VariableType::Text, "12345"),
                var("orderDate", "Order Date", VariableType::Date, today.to_string()),
                var("totalAmount", "Total Amount", VariableType::Number, "149.99"),
                var(
                    "deliveryAddress",
                    "Delivery Address",
                    VariableType::Text,
                    "123 Main St, Anytown, ST 12345",
                ),
            ],
        },
        SeedTemplate {
            name: "Password Reset",
            description: "Email for password reset requests",
            body: PASSWORD_RESET_BODY,
            variables: vec![
                var("firstName", "First Name", VariableType::Text, "John"),
                var(
                    "resetLink",
                    "Reset Link",
                    VariableType::Url,
                    "https://example.com/reset-password?token=abc123",
                ),
                var("companyName", "Company Name", VariableType::Text, "Acme Inc"),
            ],
        },
        SeedTemplate {
            name: "Shipping Notification",
            description: "Email for when an order has shipped",
            body: SHIPPING_BODY,
            variables: vec![
                var("firstName", "First Name", VariableType::Text, "John"),
                var("orderNumber", "Order Number", VariableType::Text, "12345"),
                var("trackingNumber", "Tracking Number", VariableType::Text, "1Z999AA10123456784"),
                var("carrier", "Carrier", VariableType::Text, "UPS"),
                var(
                    "trackingLink",
                    "Tracking Link",
                    VariableType::Url,
                    "https://www.ups.com/track?tracknum=1Z999AA10123456784",
                ),
                var("deliveryDate", "Expected Delivery Date", VariableType::Date, delivery.to_string()),
                var("companyName", "Company Name", VariableType::Text, "Acme Inc"),
            ],
        },
    ]
}

/// Insert the system templates when the repository holds no templates.
///
/// Returns how many templates were inserted.
pub async fn seed_defaults(repository: &dyn TemplateRepository) -> TemplateResult<usize> {
    if repository.count().await? > 0 {
        tracing::debug!("Template storage not empty, skipping seed");
        return Ok(0);
    }

    let seeds = system_templates();
    let total = seeds.len();

    for seed in seeds {
        let mut template = EmailTemplate::new(seed.name, seed.body);
        template.description = Some(seed.description.to_string());
        template.is_system = true;

        let mut data = serde_json::Map::new();
        let variables = seed
            .variables
            .into_iter()
            .map(|v| {
                data.insert(
                    v.key.to_string(),
                    serde_json::Value::String(v.default_value.clone()),
                );
                TemplateVariable::from_input(
                    template.id,
                    VariableInput {
                        key: v.key.to_string(),
                        name: v.name.to_string(),
                        var_type: Some(v.var_type),
                        default_value: Some(v.default_value),
                        description: None,
                        required: Some(true),
                    },
                )
            })
            .collect();

        let preview = PreviewDataset::new(template.id, None, data);
        repository
            .insert(template, variables, Some(preview))
            .await?;
    }

    tracing::info!(count = total, "Seeded system templates");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::placeholder::extract_placeholders;
    use crate::template::MemoryTemplateRepository;

    #[test]
    fn test_declared_variables_cover_bodies() {
        for seed in system_templates() {
            for key in extract_placeholders(seed.body) {
                assert!(
                    seed.variables.iter().any(|v| v.key == key),
                    "{} uses undeclared {}",
                    seed.name,
                    key
                );
            }
        }
    }

    #[tokio::test]
    async fn test_seed_only_into_empty_storage() {
        let repo = MemoryTemplateRepository::new();

        assert_eq!(seed_defaults(&repo).await.unwrap(), 4);
        assert_eq!(seed_defaults(&repo).await.unwrap(), 0);

        let templates = repo.list().await.unwrap();
        assert_eq!(templates.len(), 4);
        assert!(templates.iter().all(|t| t.template.is_system));

        let welcome = templates
            .iter()
            .find(|t| t.template.name == "Welcome Email")
            .unwrap();
        assert_eq!(welcome.variables.len(), 4);
        let preview = welcome.preview.as_ref().unwrap();
        assert_eq!(preview.name, "Default Preview");
        assert_eq!(preview.data["companyName"], "Acme Inc");
    }
}
