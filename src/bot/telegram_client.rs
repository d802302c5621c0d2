use crate::config::Config;
use crate::http_client;
use fang::FangError;
use frankenstein::AllowedUpdate;
use frankenstein::ErrorResponse;
use frankenstein::GetUpdatesParams;
use frankenstein::LinkPreviewOptions;
use frankenstein::ParseMode;
use frankenstein::ReplyMarkup;
use frankenstein::SendMessageParams;
use frankenstein::TelegramApi;
use frankenstein::Update;
use isahc::prelude::*;
use isahc::HttpClient;
use isahc::Request;
use std::path::PathBuf;
use std::sync::OnceLock;
use typed_builder::TypedBuilder;

static API: OnceLock<Api> = OnceLock::new();

// "Conflict: terminated by other getUpdates request". Another poller holds
// the offset; treated as an empty batch.
const CONFLICT_ERROR_CODE: u64 = 409;

#[derive(Clone, Debug)]
pub struct Api {
    pub api_url: String,
    pub http_client: HttpClient,
}

#[derive(Debug)]
pub enum Error {
    HttpError(HttpError),
    ApiError(ErrorResponse),
}

#[derive(Eq, PartialEq, Debug)]
pub struct HttpError {
    pub code: u16,
    pub message: String,
}

impl Default for Api {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Error> for FangError {
    fn from(error: Error) -> Self {
        let description = format!("telegram error: {error:?}");

        Self { description }
    }
}

#[derive(TypedBuilder)]
pub struct SimpleMessageParams {
    chat_id: i64,
    message: String,
    #[builder(default = false)]
    markdown: bool,
    #[builder(default = true)]
    preview_enabled: bool,
    #[builder(default, setter(into))]
    reply_markup: Option<ReplyMarkup>,
}

impl Api {
    pub fn new() -> Api {
        let token = Config::telegram_bot_token();
        let base_url = Config::telegram_base_url();
        let api_url = format!("{base_url}{token}");
        let http_client = http_client::client().clone();

        Api {
            api_url,
            http_client,
        }
    }

    /// One `getUpdates` call with an explicit offset. A conflict response
    /// is not an error: it means nothing new can be read right now.
    pub fn fetch_pending_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, Error> {
        let mut update_params = GetUpdatesParams::builder()
            .allowed_updates(vec![AllowedUpdate::Message])
            .build();
        update_params.offset = offset;

        match self.get_updates(&update_params) {
            Ok(response) => Ok(response.result),
            Err(Error::ApiError(response)) if response.error_code == CONFLICT_ERROR_CODE => {
                Ok(Vec::new())
            }
            Err(error) => Err(error),
        }
    }

    pub fn send_message_to_chat(&self, simple_params: &SimpleMessageParams) -> Result<(), Error> {
        let preview_params = LinkPreviewOptions::builder()
            .is_disabled(!simple_params.preview_enabled)
            .build();

        let mut message_params = SendMessageParams::builder()
            .chat_id(simple_params.chat_id)
            .text(simple_params.message.clone())
            .link_preview_options(preview_params)
            .build();

        if simple_params.markdown {
            message_params.parse_mode = Some(ParseMode::MarkdownV2);
        }

        message_params.reply_markup = simple_params.reply_markup.clone();

        self.send_message_with_params(&message_params)
    }

    pub fn send_message_with_params(
        &self,
        send_message_params: &SendMessageParams,
    ) -> Result<(), Error> {
        match self.send_message(send_message_params) {
            Ok(_) => Ok(()),
            Err(err) => {
                log::error!(
                    "Failed to send message {:?}: {:?}",
                    err,
                    send_message_params
                );
                Err(err)
            }
        }
    }
}

impl From<isahc::http::Error> for Error {
    fn from(error: isahc::http::Error) -> Self {
        let message = format!("{error:?}");

        let error = HttpError { code: 500, message };

        Error::HttpError(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        let message = format!("{error:?}");

        let error = HttpError { code: 500, message };

        Error::HttpError(error)
    }
}

impl From<isahc::Error> for Error {
    fn from(error: isahc::Error) -> Self {
        let message = format!("{error:?}");

        let error = HttpError { code: 500, message };

        Error::HttpError(error)
    }
}

impl TelegramApi for Api {
    type Error = Error;

    fn request<T1: serde::ser::Serialize, T2: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Option<T1>,
    ) -> Result<T2, Error> {
        let url = format!("{}/{method}", self.api_url);

        let request_builder = Request::post(url).header("Content-Type", "application/json");

        let mut response = match params {
            None => {
                let request = request_builder.body(())?;
                self.http_client.send(request)?
            }
            Some(data) => {
                let json = serde_json::to_string(&data).unwrap();
                let request = request_builder.body(json)?;

                self.http_client.send(request)?
            }
        };

        let mut bytes = Vec::new();
        response.copy_to(&mut bytes)?;

        let parsed_result: Result<T2, serde_json::Error> = serde_json::from_slice(&bytes);

        match parsed_result {
            Ok(result) => Ok(result),
            Err(serde_error) => {
                let parsed_error: Result<ErrorResponse, serde_json::Error> =
                    serde_json::from_slice(&bytes);

                match parsed_error {
                    Ok(result) => Err(Error::ApiError(result)),
                    Err(error) => {
                        log::error!("Failed to parse a response {serde_error:?}");

                        let message = format!("{:?} {error:?}", std::str::from_utf8(&bytes));

                        let error = HttpError { code: 500, message };

                        Err(Error::HttpError(error))
                    }
                }
            }
        }
    }

    // isahc doesn't support multipart uploads, and this bot never uploads
    // files
    fn request_with_form_data<T1: serde::ser::Serialize, T2: serde::de::DeserializeOwned>(
        &self,
        _method: &str,
        _params: T1,
        _files: Vec<(&str, PathBuf)>,
    ) -> Result<T2, Error> {
        let error = HttpError {
            code: 500,
            message: "isahc doesn't support form data requests".to_string(),
        };

        Err(Error::HttpError(error))
    }
}

pub fn api() -> &'static Api {
    API.get_or_init(Api::new)
}

#[cfg(test)]
mod tests {
    use super::Api;
    use crate::http_client;

    fn build_api(server_url: &str) -> Api {
        Api {
            api_url: format!("{server_url}/bottest-token"),
            http_client: http_client::client().clone(),
        }
    }

    #[test]
    fn fetch_pending_updates_returns_the_update_batch() {
        let mut server = mockito::Server::new();
        let api = build_api(&server.url());

        let body = r#"{"ok":true,"result":[{"update_id":100,"message":{"message_id":1,"date":1700000000,"chat":{"id":42,"type":"private"},"text":"/help"}}]}"#;
        let mock = server
            .mock("POST", "/bottest-token/getUpdates")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let updates = api.fetch_pending_updates(Some(100)).unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 100);

        mock.assert();
    }

    #[test]
    fn fetch_pending_updates_swallows_a_conflict_response() {
        let mut server = mockito::Server::new();
        let api = build_api(&server.url());

        let body = r#"{"ok":false,"error_code":409,"description":"Conflict: terminated by other getUpdates request"}"#;
        let mock = server
            .mock("POST", "/bottest-token/getUpdates")
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let updates = api.fetch_pending_updates(None).unwrap();

        assert!(updates.is_empty());

        mock.assert();
    }

    #[test]
    fn fetch_pending_updates_surfaces_other_api_errors() {
        let mut server = mockito::Server::new();
        let api = build_api(&server.url());

        let body = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#;
        let mock = server
            .mock("POST", "/bottest-token/getUpdates")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let result = api.fetch_pending_updates(None);

        assert!(result.is_err());

        mock.assert();
    }
}
