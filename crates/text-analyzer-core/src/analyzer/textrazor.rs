use serde::Deserialize;

use super::{AnalysisError, AnalysisFuture, AnalysisOutcome, Analyzer, Entity, OutcomeKind, Topic};
use crate::{Config, CoreError};

pub const DEFAULT_ENDPOINT: &str = "https://api.textrazor.com/";
pub const DEFAULT_EXTRACTORS: &[&str] = &["entities", "topics"];

/// Topics beyond this many (by score) are dropped from the outcome.
const MAX_TOPICS: usize = 10;

/// TextRazor REST backend.
pub struct TextRazorAnalyzer {
    client: reqwest::Client,
    endpoint: String,
    extractors: String,
}

impl TextRazorAnalyzer {
    pub fn new(endpoint: impl Into<String>, extractors: &[String]) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("text-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let extractors = if extractors.is_empty() {
            DEFAULT_EXTRACTORS.join(",")
        } else {
            extractors.join(",")
        };
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            extractors,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        Self::new(config.endpoint.clone(), &config.extractors)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Analyzer for TextRazorAnalyzer {
    fn name(&self) -> &str {
        "TextRazor"
    }

    fn analyze<'a>(&'a self, content: &'a str, credentials: &'a str) -> AnalysisFuture<'a> {
        Box::pin(async move {
            if content.is_empty() {
                return Err(AnalysisError::EmptyContent);
            }

            tracing::debug!(
                endpoint = %self.endpoint,
                bytes = content.len(),
                "sending analysis request"
            );

            let resp = self
                .client
                .post(&self.endpoint)
                .header("X-TextRazor-Key", credentials)
                .form(&[("text", content), ("extractors", self.extractors.as_str())])
                .send()
                .await
                .map_err(|e| {
                    // The key header is the only caller-controlled part of the request.
                    if e.is_builder() {
                        AnalysisError::Auth("API key contains invalid characters".into())
                    } else {
                        AnalysisError::Network(e.to_string())
                    }
                })?;

            classify_response(resp).await
        })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    ok: Option<bool>,
    error: Option<String>,
    response: Option<ResponseBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBody {
    language: Option<String>,
    #[serde(default)]
    entities: Vec<RawEntity>,
    #[serde(default)]
    topics: Vec<RawTopic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntity {
    entity_id: Option<String>,
    matched_text: Option<String>,
    relevance_score: Option<f64>,
    confidence_score: Option<f64>,
    #[serde(default, rename = "type")]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTopic {
    label: String,
    score: Option<f64>,
}

/// Map an HTTP response from the analysis service to a typed outcome.
///
/// 401/403 become [`AnalysisError::Auth`], any other non-2xx status becomes
/// [`AnalysisError::Service`], and a 2xx body that doesn't parse becomes
/// [`AnalysisError::MalformedResponse`].
pub async fn classify_response(resp: reqwest::Response) -> Result<AnalysisOutcome, AnalysisError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| AnalysisError::Network(e.to_string()))?;

    let reason = || {
        status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    };

    if status.as_u16() == 401 || status.as_u16() == 403 {
        tracing::warn!(status = status.as_u16(), "analysis credentials rejected");
        return Err(AnalysisError::Auth(
            error_field(&body).unwrap_or_else(reason),
        ));
    }
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "analysis service error");
        return Err(AnalysisError::Service {
            status: status.as_u16(),
            message: error_field(&body).unwrap_or_else(reason),
        });
    }

    let envelope: Envelope = serde_json::from_str(&body)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    if envelope.ok == Some(false) {
        return Err(AnalysisError::Service {
            status: status.as_u16(),
            message: envelope
                .error
                .unwrap_or_else(|| "request was not processed".to_string()),
        });
    }

    let response = envelope
        .response
        .ok_or_else(|| AnalysisError::MalformedResponse("missing `response` object".into()))?;

    Ok(normalize(response))
}

/// Pull the `error` string out of a JSON error body, if there is one.
fn error_field(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["error"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn normalize(body: ResponseBody) -> AnalysisOutcome {
    let entities: Vec<Entity> = body
        .entities
        .into_iter()
        .map(|e| {
            let matched_text = e.matched_text.unwrap_or_default();
            Entity {
                id: e.entity_id.unwrap_or_else(|| matched_text.clone()),
                matched_text,
                relevance: e.relevance_score.unwrap_or(0.0).clamp(0.0, 1.0),
                confidence: e.confidence_score.unwrap_or(0.0),
                types: e.types,
            }
        })
        .collect();

    let mut topics: Vec<Topic> = body
        .topics
        .into_iter()
        .map(|t| Topic {
            label: t.label,
            score: t.score.unwrap_or(0.0),
        })
        .collect();
    topics.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    topics.truncate(MAX_TOPICS);

    let count = entities.len();
    let text = if count == 1 {
        "1 entity found".to_string()
    } else {
        format!("{} entities found", count)
    };
    let kind = if count > 0 || !topics.is_empty() {
        OutcomeKind::Info
    } else {
        OutcomeKind::Warning
    };
    let confidence = if count > 0 {
        Some(entities.iter().map(|e| e.relevance).sum::<f64>() / count as f64)
    } else {
        None
    };

    AnalysisOutcome {
        kind,
        text,
        confidence,
        language: body.language,
        entities,
        topics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        let http_resp = http::Response::builder().status(status).body(body).unwrap();
        reqwest::Response::from(http_resp)
    }

    const THREE_ENTITIES: &str = r#"{
        "time": 0.012,
        "ok": true,
        "response": {
            "language": "eng",
            "entities": [
                {"entityId": "Rust (programming language)", "matchedText": "Rust", "relevanceScore": 0.9, "confidenceScore": 7.1, "type": ["Software"]},
                {"entityId": "Mozilla", "matchedText": "Mozilla", "relevanceScore": 0.6, "confidenceScore": 3.2, "type": ["Company", "Organisation"]},
                {"matchedText": "Ferris", "relevanceScore": 0.3}
            ],
            "topics": [
                {"label": "Programming languages", "score": 0.4},
                {"label": "Software", "score": 0.95}
            ]
        }
    }"#;

    #[tokio::test]
    async fn success_normalizes_entities_and_topics() {
        let outcome = classify_response(response(200, THREE_ENTITIES))
            .await
            .unwrap();
        assert_eq!(outcome.kind, OutcomeKind::Info);
        assert_eq!(outcome.text, "3 entities found");
        assert_eq!(outcome.language.as_deref(), Some("eng"));
        assert_eq!(outcome.entities.len(), 3);
        // Missing entityId falls back to the matched text
        assert_eq!(outcome.entities[2].id, "Ferris");
        assert_eq!(outcome.entities[1].types, vec!["Company", "Organisation"]);
        // Topics come back highest score first
        assert_eq!(outcome.topics[0].label, "Software");
        let confidence = outcome.confidence.unwrap();
        assert!((confidence - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn single_entity_uses_singular_text() {
        let body = r#"{"ok": true, "response": {"entities": [{"entityId": "Paris", "relevanceScore": 2.5}]}}"#;
        let outcome = classify_response(response(200, body)).await.unwrap();
        assert_eq!(outcome.text, "1 entity found");
        // Relevance is clamped into 0..=1
        assert_eq!(outcome.entities[0].relevance, 1.0);
    }

    #[tokio::test]
    async fn empty_response_is_warning_without_confidence() {
        let body = r#"{"ok": true, "response": {"language": "eng"}}"#;
        let outcome = classify_response(response(200, body)).await.unwrap();
        assert_eq!(outcome.kind, OutcomeKind::Warning);
        assert_eq!(outcome.text, "0 entities found");
        assert!(outcome.confidence.is_none());
    }

    #[tokio::test]
    async fn unauthorized_is_auth_error() {
        let body = r#"{"ok": false, "error": "Your TextRazor API Key was invalid."}"#;
        let err = classify_response(response(401, body)).await.unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Auth("Your TextRazor API Key was invalid.".into())
        );
    }

    #[tokio::test]
    async fn forbidden_without_body_uses_reason() {
        let err = classify_response(response(403, "")).await.unwrap_err();
        assert_eq!(err, AnalysisError::Auth("Forbidden".into()));
    }

    #[tokio::test]
    async fn server_error_is_service_error() {
        let body = r#"{"ok": false, "error": "Text too long"}"#;
        let err = classify_response(response(400, body)).await.unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Service {
                status: 400,
                message: "Text too long".into()
            }
        );

        let err = classify_response(response(502, "<html>bad gateway</html>"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Service {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }

    #[tokio::test]
    async fn ok_false_on_2xx_is_service_error() {
        let body = r#"{"ok": false, "error": "Unsupported language"}"#;
        let err = classify_response(response(200, body)).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Service { status: 200, .. }));
    }

    #[tokio::test]
    async fn unparsable_body_is_malformed() {
        let err = classify_response(response(200, "not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));

        let err = classify_response(response(200, r#"{"ok": true}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_content_is_rejected_before_sending() {
        // Unroutable endpoint: the call must fail before any I/O happens.
        let analyzer = TextRazorAnalyzer::new("http://127.0.0.1:9/", &[]).unwrap();
        let err = analyzer.analyze("", "key").await.unwrap_err();
        assert_eq!(err, AnalysisError::EmptyContent);
    }

    #[test]
    fn default_extractors_used_when_none_given() {
        let analyzer = TextRazorAnalyzer::new(DEFAULT_ENDPOINT, &[]).unwrap();
        assert_eq!(analyzer.extractors, "entities,topics");
        let analyzer =
            TextRazorAnalyzer::new(DEFAULT_ENDPOINT, &["entities".to_string()]).unwrap();
        assert_eq!(analyzer.extractors, "entities");
        assert_eq!(analyzer.endpoint(), DEFAULT_ENDPOINT);
    }
}
