//! Email service for workflow notifications.

use lettre::{
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::path::Path;

use crate::{config::EmailConfig, errors::Error};

pub struct EmailService {
    transport: EmailTransport,
    from_email: String,
    from_name: String,
}

enum EmailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

impl EmailService {
    pub fn new(config: &EmailConfig) -> Result<Self, Error> {
        let transport = match &config.transport {
            crate::config::EmailTransportConfig::Smtp {
                host,
                port,
                username,
                password,
                use_tls,
            } => {
                if !use_tls {
                    tracing::warn!("SMTP TLS is disabled - this is not recommended for production");
                }

                let smtp_builder = if *use_tls {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                } else {
                    Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host))
                }
                .map_err(|e| Error::Internal {
                    operation: format!("create SMTP transport: {e}"),
                })?
                .port(*port)
                .credentials(Credentials::new(username.clone(), password.clone()));

                EmailTransport::Smtp(smtp_builder.build())
            }
            crate::config::EmailTransportConfig::File { path } => {
                let emails_dir = Path::new(path);
                if !emails_dir.exists() {
                    std::fs::create_dir_all(emails_dir).map_err(|e| Error::Internal {
                        operation: format!("create emails directory: {e}"),
                    })?;
                }
                EmailTransport::File(AsyncFileTransport::<Tokio1Executor>::new(emails_dir))
            }
        };

        Ok(Self {
            transport,
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }

    /// Tell a tutor that a student has unlocked their contact details
    pub async fn send_contact_notification(&self, to_email: &str, to_name: &str, student_name: &str) -> Result<(), Error> {
        let subject = "A student wants to get in touch";
        let body = self.create_contact_body(to_name, student_name);
        self.send_email(to_email, Some(to_name), subject, &body).await
    }

    /// Tell a post owner that a tutor has applied
    pub async fn send_application_notification(&self, to_email: &str, to_name: &str, teacher_name: &str) -> Result<(), Error> {
        let subject = "New application to your tutoring post";
        let body = self.create_application_body(to_name, teacher_name);
        self.send_email(to_email, Some(to_name), subject, &body).await
    }

    async fn send_email(&self, to_email: &str, to_name: Option<&str>, subject: &str, body: &str) -> Result<(), Error> {
        let from = format!("{} <{}>", self.from_name, self.from_email)
            .parse::<Mailbox>()
            .map_err(|e| Error::Internal {
                operation: format!("parse from email: {e}"),
            })?;

        let to = if let Some(name) = to_name {
            format!("{name} <{to_email}>")
        } else {
            to_email.to_string()
        }
        .parse::<Mailbox>()
        .map_err(|e| Error::Internal {
            operation: format!("parse to email: {e}"),
        })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| Error::Internal {
                operation: format!("build email message: {e}"),
            })?;

        match &self.transport {
            EmailTransport::Smtp(smtp) => {
                smtp.send(message).await.map_err(|e| Error::Internal {
                    operation: format!("send SMTP email: {e}"),
                })?;
            }
            EmailTransport::File(file) => {
                file.send(message).await.map_err(|e| Error::Internal {
                    operation: format!("send file email: {e}"),
                })?;
            }
        }

        Ok(())
    }

    fn create_contact_body(&self, to_name: &str, student_name: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<body>
    <p>Hello {to_name},</p>
    <p>{student_name} has unlocked your contact details and may reach out to you soon.</p>
    <p>You can see all your contact requests in your dashboard.</p>
    <p>This is an automated message, please do not reply to this email.</p>
</body>
</html>"#
        )
    }

    fn create_application_body(&self, to_name: &str, teacher_name: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<body>
    <p>Hello {to_name},</p>
    <p>{teacher_name} has applied to your tutoring post. Review the application in your dashboard.</p>
    <p>This is an automated message, please do not reply to this email.</p>
</body>
</html>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmailConfig, EmailTransportConfig};

    fn file_config(dir: &std::path::Path) -> EmailConfig {
        EmailConfig {
            transport: EmailTransportConfig::File {
                path: dir.to_string_lossy().to_string(),
            },
            from_email: "noreply@example.com".to_string(),
            from_name: "TutorLink".to_string(),
        }
    }

    #[tokio::test]
    async fn file_transport_writes_the_notification() {
        let dir = tempfile::tempdir().unwrap();
        let service = EmailService::new(&file_config(dir.path())).unwrap();

        service
            .send_contact_notification("tutor@example.com", "Asha", "Bilal")
            .await
            .unwrap();

        let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn bodies_mention_the_counterparty() {
        let dir = tempfile::tempdir().unwrap();
        let service = EmailService::new(&file_config(dir.path())).unwrap();

        let body = service.create_contact_body("Asha", "Bilal");
        assert!(body.contains("Hello Asha,"));
        assert!(body.contains("Bilal has unlocked"));

        let body = service.create_application_body("Bilal", "Asha");
        assert!(body.contains("Asha has applied"));
    }
}
