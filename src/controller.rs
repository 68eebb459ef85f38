//! Generation lifecycle orchestration.
//!
//! The controller owns the single shared mutable cell (the outcome) plus a
//! request counter. Overlapping `generate` calls are allowed and each one
//! issues its own request; a resolution may write the cell only while its
//! attempt is still the most recently issued one, so stale resolutions are
//! dropped instead of clobbering a newer attempt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::client::GenerationClient;
use crate::error::GenerateError;
use crate::form::{self, FormState};
use crate::protocol::{AssessmentResult, GenerationRequest};

/// What the frontend currently shows about a generation attempt. Exactly one
/// variant is active at a time; each attempt replaces the cell wholesale.
#[derive(Clone, Debug, Default)]
pub enum GenerationOutcome {
    #[default]
    Idle,
    Loading,
    Success(AssessmentResult),
    Failure(String),
}

#[derive(Clone)]
pub struct GenerationController {
    client: GenerationClient,
    outcome: Arc<RwLock<GenerationOutcome>>,
    seq: Arc<AtomicU64>,
}

impl GenerationController {
    pub fn new(client: GenerationClient) -> Self {
        Self {
            client,
            outcome: Arc::new(RwLock::new(GenerationOutcome::Idle)),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Snapshot of the current outcome.
    pub async fn outcome(&self) -> GenerationOutcome {
        self.outcome.read().await.clone()
    }

    /// Run one generation attempt against a snapshot of the form. Never
    /// returns an error: every failure is absorbed into the outcome cell.
    #[instrument(level = "info", skip(self, form), fields(difficulty = %form.difficulty))]
    pub async fn generate(&self, form: &FormState) {
        // Precondition check, before any I/O or state clearing.
        if let Err(reason) = form::validate(form) {
            let err = GenerateError::Validation(reason);
            warn!(target: "assessgen", error = %err, "Submission rejected by validator");
            *self.outcome.write().await = GenerationOutcome::Failure(err.to_string());
            return;
        }

        let request = GenerationRequest::from_form(form);
        let stamp = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.write_if_current(stamp, GenerationOutcome::Loading).await;

        let resolved = match self.client.generate(&request).await {
            Ok(result) => {
                info!(
                    target: "assessgen",
                    attempt = stamp,
                    items = result.assessment.len(),
                    "Attempt succeeded"
                );
                GenerationOutcome::Success(result)
            }
            Err(e) => {
                error!(target: "assessgen", attempt = stamp, status = ?e.status(), error = %e, "Attempt failed");
                GenerationOutcome::Failure(e.to_string())
            }
        };

        self.write_if_current(stamp, resolved).await;
    }

    /// Replace the outcome unless a newer attempt has been issued since
    /// `stamp`; the newer attempt owns the cell now.
    async fn write_if_current(&self, stamp: u64, next: GenerationOutcome) {
        let mut outcome = self.outcome.write().await;
        if self.seq.load(Ordering::SeqCst) == stamp {
            *outcome = next;
        } else {
            warn!(target: "assessgen", attempt = stamp, "Dropping superseded attempt state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn controller_for(base_url: String) -> GenerationController {
        let cfg = Config {
            backend_url: base_url,
            request_timeout: None,
            out_dir: ".".into(),
        };
        GenerationController::new(GenerationClient::new(&cfg))
    }

    fn valid_form() -> FormState {
        FormState {
            role: "Product Analyst".into(),
            skills: "SQL, Product-Metrics".into(),
            ..Default::default()
        }
    }

    fn success_body(marker: &str) -> String {
        format!(
            r#"{{"assessment":[{{"type":"MCQ","question":"q1"}},{{"scenario":"launch gone wrong"}}],"coverage_report":{{"marker":"{marker}"}}}}"#
        )
    }

    async fn read_request(sock: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut tmp = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            match sock.read(&mut tmp).await {
                Ok(0) | Err(_) => return String::from_utf8_lossy(&buf).into_owned(),
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
            }
        }
        let header_end = buf.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
        let headers = String::from_utf8_lossy(&buf[..header_end]).into_owned();
        let content_length = headers
            .lines()
            .find_map(|l| {
                let (k, v) = l.split_once(':')?;
                if k.eq_ignore_ascii_case("content-length") {
                    v.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        while buf.len() - header_end < content_length {
            match sock.read(&mut tmp).await {
                Ok(0) | Err(_) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Canned-response HTTP stub. `respond` sees the raw request text and
    /// returns (status line, body, artificial delay before answering).
    async fn spawn_stub(
        hits: Arc<AtomicUsize>,
        respond: fn(&str) -> (&'static str, String, Duration),
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else { break };
                hits.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let req = read_request(&mut sock).await;
                    let (status, body, delay) = respond(&req);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let res = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = sock.write_all(res.as_bytes()).await;
                    let _ = sock.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    async fn await_loading(controller: &GenerationController) -> bool {
        for _ in 0..100 {
            if matches!(controller.outcome().await, GenerationOutcome::Loading) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    #[tokio::test]
    async fn outcome_starts_idle() {
        let controller = controller_for("http://127.0.0.1:9".into());
        assert!(matches!(controller.outcome().await, GenerationOutcome::Idle));
    }

    #[tokio::test]
    async fn invalid_form_never_contacts_the_service() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(hits.clone(), |_| {
            ("200 OK", r#"{"assessment":[],"coverage_report":{}}"#.into(), Duration::ZERO)
        })
        .await;

        let controller = controller_for(base);
        let form = FormState { role: "  ".into(), skills: "".into(), ..Default::default() };
        controller.generate(&form).await;

        match controller.outcome().await {
            GenerationOutcome::Failure(msg) => assert_eq!(msg, "Please fill in role and skills"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_form_passes_through_loading_to_success() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(hits.clone(), |_| {
            ("200 OK", success_body("ok"), Duration::from_millis(200))
        })
        .await;

        let controller = controller_for(base);
        let handle = {
            let c = controller.clone();
            tokio::spawn(async move { c.generate(&valid_form()).await })
        };

        assert!(await_loading(&controller).await, "Loading never observed");
        handle.await.unwrap();

        match controller.outcome().await {
            GenerationOutcome::Success(result) => {
                assert_eq!(result.assessment.len(), 2);
                assert_eq!(result.coverage_report["marker"], "ok");
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_coverage_report_is_a_format_failure() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(hits, |_| {
            ("200 OK", r#"{"assessment":[{"question":"q"}]}"#.into(), Duration::ZERO)
        })
        .await;

        let controller = controller_for(base);
        controller.generate(&valid_form()).await;

        match controller.outcome().await {
            GenerationOutcome::Failure(msg) => {
                assert_eq!(msg, "Invalid response format from server")
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_detail_reaches_the_failure_message() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(hits, |_| {
            ("429 Too Many Requests", r#"{"detail":"quota exceeded"}"#.into(), Duration::ZERO)
        })
        .await;

        let controller = controller_for(base);
        controller.generate(&valid_form()).await;

        match controller.outcome().await {
            GenerationOutcome::Failure(msg) => assert_eq!(msg, "quota exceeded"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_error_body_falls_back_to_stock_message() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(hits, |_| {
            ("500 Internal Server Error", "<html>boom</html>".into(), Duration::ZERO)
        })
        .await;

        let controller = controller_for(base);
        controller.generate(&valid_form()).await;

        match controller.outcome().await {
            GenerationOutcome::Failure(msg) => assert_eq!(msg, "Failed to generate assessment"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connect_failure_becomes_a_failure_outcome() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let controller = controller_for(format!("http://{addr}"));
        controller.generate(&valid_form()).await;

        match controller.outcome().await {
            GenerationOutcome::Failure(msg) => assert!(!msg.is_empty()),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn latest_issued_attempt_wins_even_if_it_settles_first() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_stub(hits.clone(), |req| {
            if req.contains("Slow Analyst") {
                ("200 OK", success_body("slow"), Duration::from_millis(400))
            } else {
                ("200 OK", success_body("fast"), Duration::ZERO)
            }
        })
        .await;

        let controller = controller_for(base);

        let slow = {
            let c = controller.clone();
            tokio::spawn(async move {
                let form = FormState { role: "Slow Analyst".into(), ..valid_form() };
                c.generate(&form).await;
            })
        };
        // Let the first attempt stamp itself and go in flight.
        assert!(await_loading(&controller).await);

        controller.generate(&valid_form()).await;
        slow.await.unwrap();

        match controller.outcome().await {
            GenerationOutcome::Success(result) => {
                assert_eq!(result.coverage_report["marker"], "fast");
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
