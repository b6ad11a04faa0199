//! Failure → user-visible presentation, per frontend
//!
//! Only client-facing failures show their own message; everything else is
//! replaced by the generic unexpected-error message. With `debug/enable`
//! the whole failure chain is appended for operators.

use std::fmt::Write as _;
use std::io::{self, Write};

use tracing::{error, warn};

use crate::application::runtime::Runtime;
use crate::domain::http::Response;
use crate::domain::message::UNEXPECTED_ERROR;
use crate::domain::{Dictionary, Failure, Frontend, Message};
use crate::exitcode;

/// Rendered failure, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// HTTP status, web frontend only
    pub status: Option<i32>,
    /// HTTP status line, web frontend only
    pub status_line: Option<String>,
    pub body: String,
    pub exit_code: i32,
}

impl Translation {
    /// Web output starts with CGI response headers (`Status`, `Content-Type`).
    pub fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        if let Some(status) = self.status {
            write!(
                out,
                "{}\r\nContent-Type: text/html; charset=utf-8\r\n\r\n",
                Response::status_header(status)
            )?;
        }
        out.write_all(self.body.as_bytes())?;
        out.flush()
    }
}

pub struct ExceptionTranslator<'a> {
    dictionary: &'a Dictionary,
    debug: bool,
}

impl<'a> ExceptionTranslator<'a> {
    pub fn new(dictionary: &'a Dictionary, debug: bool) -> Self {
        Self { dictionary, debug }
    }

    /// Client-safe message: the failure's own for client-facing failures,
    /// the generic unexpected-error message otherwise.
    pub fn client_message(&self, failure: &Failure) -> String {
        let fallback = Message::from(UNEXPECTED_ERROR);
        let message = failure.client_message().unwrap_or(&fallback);
        self.dictionary.render(message)
    }

    pub fn translate(&self, frontend: Frontend, failure: &Failure) -> Translation {
        let message = self.client_message(failure);
        match frontend {
            Frontend::Web => {
                let code = failure.code();
                let status = if Response::is_valid_status(code) { code } else { 500 };
                let mut body = format!("{message}<br/>\n");
                if self.debug {
                    body.push_str(&nl2br(&render_chain(failure)));
                }
                Translation {
                    status: Some(status),
                    status_line: Some(Response::status_line(status)),
                    body,
                    exit_code: exitcode::OK,
                }
            }
            Frontend::Cli => {
                let mut body = format!("{message}\n");
                if self.debug {
                    body.push_str(&render_chain(failure));
                }
                let exit_code = match failure.code() {
                    0 => exitcode::FAILURE,
                    code => code,
                };
                Translation {
                    status: None,
                    status_line: None,
                    body,
                    exit_code,
                }
            }
        }
    }
}

/// One block per failure, outermost first and oldest cause last.
pub fn render_chain(failure: &Failure) -> String {
    let mut result = String::new();
    for (i, f) in failure.chain().enumerate() {
        let prefix = if i == 0 { "Exception" } else { "Caused by" };
        let _ = writeln!(result, "{prefix} '{}' thrown from {}", f.message(), f.location());
        let _ = writeln!(
            result,
            "Stacktrace: {}",
            f.trace().unwrap_or("unavailable (set RUST_BACKTRACE=1 to capture)")
        );
    }
    result
}

fn nl2br(text: &str) -> String {
    text.replace('\n', "<br />\n")
}

/// Default exception handler for both frontends.
pub fn handle_failure(rt: &mut Runtime<'_>, failure: &Failure) -> i32 {
    let frontend = rt.frontend();
    let services = rt.services();
    let translator = ExceptionTranslator::new(&services.dictionary, services.config.get_bool("debug/enable"));
    let translation = translator.translate(frontend, failure);

    error!(
        %frontend,
        code = failure.code(),
        client_facing = failure.is_client_facing(),
        location = %failure.location(),
        "request failed: {}",
        failure.message()
    );

    if let Err(e) = translation.write_to(rt.out()) {
        warn!("failed to write error output: {e}");
    }
    translation.exit_code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DictionaryMessage;

    fn db_failure() -> Failure {
        Failure::unexpected("query users failed").caused_by(Failure::unexpected("DB connection refused"))
    }

    #[test]
    fn given_chain_when_render_then_oldest_cause_last() {
        let rendered = render_chain(&db_failure());
        let outer = rendered.find("Exception 'query users failed'").expect("outer");
        let inner = rendered.find("Caused by 'DB connection refused'").expect("cause");
        assert!(outer < inner);
        assert_eq!(rendered.matches("Stacktrace: ").count(), 2);
    }

    #[test]
    fn given_client_failure_with_plain_key_when_client_message_then_rendered_through_dictionary() {
        let mut dict = Dictionary::default();
        dict.insert("error.quota", "Quota exceeded");
        let translator = ExceptionTranslator::new(&dict, false);
        let failure = Failure::client("user 7 over quota", "error.quota", 75);
        assert_eq!(translator.client_message(&failure), "Quota exceeded");
    }

    #[test]
    fn given_web_debug_when_translate_then_chain_uses_html_breaks() {
        let dict = Dictionary::default();
        let translator = ExceptionTranslator::new(&dict, true);
        let t = translator.translate(Frontend::Web, &db_failure());
        assert!(t.body.starts_with("An unexpected error occurred<br/>\n"));
        assert!(t.body.contains("DB connection refused"));
        assert!(t.body.contains("<br />\n"));
        assert_eq!(t.exit_code, exitcode::OK);
    }

    #[test]
    fn given_web_translation_when_write_to_then_cgi_status_header_first() {
        let dict = Dictionary::default();
        let translator = ExceptionTranslator::new(&dict, false);
        let failure = Failure::client("no such page", Message::Literal("Not here".into()), 404);
        let t = translator.translate(Frontend::Web, &failure);
        assert_eq!(t.status_line.as_deref(), Some("HTTP/1.1 404 Not Found"));

        let mut out = Vec::<u8>::new();
        t.write_to(&mut out).expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Status: 404 Not Found\r\nContent-Type: text/html; charset=utf-8\r\n\r\nNot here<br/>\n"
        );
    }

    #[test]
    fn given_cli_client_failure_when_translate_then_exit_code_is_failure_code() {
        let dict = Dictionary::default();
        let translator = ExceptionTranslator::new(&dict, false);
        let failure = Failure::client(
            "Invalid handler",
            DictionaryMessage::new("error.cli.invalid-command").with_param("command", "deploy"),
            126,
        );
        let t = translator.translate(Frontend::Cli, &failure);
        assert_eq!(t.body, "Invalid command: deploy\n");
        assert_eq!(t.exit_code, 126);
        assert_eq!(t.status_line, None);
        assert_eq!(t.status, None);
    }
}
