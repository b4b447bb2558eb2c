//! AI API and fetched page mock endpoints.

use mockito::Mock;

use crate::{constant::TEST_AI_API_KEY, TestContext};

impl TestContext {
    pub fn ai<'a>(&'a mut self) -> AiFixtures<'a> {
        AiFixtures { setup: self }
    }
}

pub struct AiFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> AiFixtures<'a> {
    /// Mock `POST /chat/completions` replying with `content` as the assistant message.
    pub fn create_completion_endpoint(&mut self, content: &str, expected_requests: usize) -> Mock {
        let body = serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        });

        self.setup
            .server
            .mock("POST", "/chat/completions")
            .match_header(
                "authorization",
                format!("Bearer {}", TEST_AI_API_KEY).as_str(),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock `POST /chat/completions` failing with `status`.
    pub fn create_failing_completion_endpoint(
        &mut self,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", "/chat/completions")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"bad request"}}"#)
            .expect(expected_requests)
            .create()
    }

    /// Mock an HTML page served at `path`, returning its full URL and the mock.
    pub fn create_page_endpoint(
        &mut self,
        path: &str,
        html: &str,
        expected_requests: usize,
    ) -> (String, Mock) {
        let mock = self
            .setup
            .server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(html)
            .expect(expected_requests)
            .create();

        (format!("{}{}", self.setup.server.url(), path), mock)
    }
}
