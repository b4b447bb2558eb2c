//! Email API mock endpoints.

use mockito::{Matcher, Mock};

use crate::{constant::TEST_EMAIL_API_KEY, TestContext};

impl TestContext {
    pub fn mail<'a>(&'a mut self) -> MailFixtures<'a> {
        MailFixtures { setup: self }
    }
}

pub struct MailFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> MailFixtures<'a> {
    /// Mock a successful `POST /emails`.
    pub fn create_email_endpoint(&mut self, expected_requests: usize) -> Mock {
        self.create_email_endpoint_with_status(200, expected_requests)
    }

    /// Mock `POST /emails` answering with `status`.
    pub fn create_email_endpoint_with_status(
        &mut self,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", "/emails")
            .match_header(
                "authorization",
                format!("Bearer {}", TEST_EMAIL_API_KEY).as_str(),
            )
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"email_test"}"#)
            .expect(expected_requests)
            .create()
    }

    /// Mock a successful `POST /emails` whose recipient list contains `to`.
    pub fn create_email_endpoint_to(&mut self, to: &str, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("POST", "/emails")
            .match_body(Matcher::PartialJson(serde_json::json!({ "to": [to] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"email_test"}"#)
            .expect(expected_requests)
            .create()
    }
}
