use anyhow::Result;
use chatbox_shared::{GetResponseForm, ReplyBody, GET_RESPONSE_PATH};

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    user_id: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            user_id: user_id.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Posts one message and returns the `response` field of the reply.
    ///
    /// No timeout is set; a hung server keeps the future pending.
    pub async fn get_response(&self, message: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, GET_RESPONSE_PATH);

        let form = GetResponseForm {
            message: message.to_string(),
            user_id: self.user_id.clone(),
        };

        let response = self.client
            .post(&url)
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Request failed: {}", response.status()));
        }

        let reply = response.json::<ReplyBody>().await?;
        Ok(reply.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let client = ApiClient::new("http://localhost:5000/", "user123");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.user_id(), "user123");
    }
}
