//! Chat service: drives one conversation turn end to end.
//!
//! ChatService owns a [`ConversationSession`] and coordinates the persona
//! registry, the wallet source, the [`ModelGateway`] and the
//! [`ProposalExtractor`]. The session lock is only held for the synchronous
//! transitions, never across the backend call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{Instrument, info, info_span};

use castagents_types::chat::{ChatMessage, TurnState};
use castagents_types::error::SessionError;
use castagents_types::llm::GatewayError;
use castagents_types::persona::{Persona, PersonaId};

use crate::agent::context::ContextAssembler;
use crate::agent::gateway::ModelGateway;
use crate::agent::proposal::{Extraction, ProposalExtractor};
use crate::persona::PersonaRegistry;
use crate::wallet::WalletSource;

use super::session::ConversationSession;

/// Orchestrates turns for a single conversation.
pub struct ChatService {
    session: Mutex<ConversationSession>,
    registry: Arc<PersonaRegistry>,
    gateway: Arc<ModelGateway>,
    wallet: Arc<dyn WalletSource>,
    processing: watch::Sender<bool>,
}

impl ChatService {
    pub fn new(
        registry: Arc<PersonaRegistry>,
        gateway: Arc<ModelGateway>,
        wallet: Arc<dyn WalletSource>,
        persona: PersonaId,
    ) -> Self {
        let (processing, _) = watch::channel(false);
        Self {
            session: Mutex::new(ConversationSession::new(persona)),
            registry,
            gateway,
            wallet,
            processing,
        }
    }

    fn session(&self) -> MutexGuard<'_, ConversationSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send a user message and wait for the model's reply.
    ///
    /// Returns the appended model message. Rejections (`Busy`, blank input)
    /// leave the transcript untouched. Backend failures are not errors here:
    /// they come back as the fixed failure reply.
    pub async fn send(&self, text: &str) -> Result<ChatMessage, SessionError> {
        let (turn, persona) = {
            let mut session = self.session();
            let persona = self.resolve_persona(session.persona())?.clone();
            let turn = session.submit(text)?;
            (turn, persona)
        };
        self.processing.send_replace(true);

        let mut guard = TurnGuard {
            service: self,
            token: turn.token,
            armed: true,
        };

        let span = info_span!("chat.turn", persona = %persona.id, token = turn.token);
        let outcome = async {
            let wallet = self.wallet.snapshot();
            let context =
                ContextAssembler::assemble(&persona, &turn.prior_turns, &turn.user_text, &wallet);
            let raw = self.gateway.generate(&context.system, &context.prompt).await?;
            Ok::<_, GatewayError>(ProposalExtractor::extract(&raw))
        }
        .instrument(span)
        .await;

        guard.armed = false;
        let message = self.finish(turn.token, outcome)?;
        info!(
            persona = %persona.id,
            has_proposal = message.proposal().is_some(),
            "Turn complete"
        );
        Ok(message)
    }

    fn finish(
        &self,
        token: u64,
        outcome: Result<Extraction, GatewayError>,
    ) -> Result<ChatMessage, SessionError> {
        let result = self.session().complete(token, outcome).cloned();
        self.processing.send_replace(false);
        result
    }

    /// Switch persona and clear the transcript. Rejected while a turn is in flight.
    pub fn select_persona(&self, persona: PersonaId) -> Result<(), SessionError> {
        self.resolve_persona(persona)?;
        self.session().select_persona(persona)?;
        info!(%persona, "Persona selected");
        Ok(())
    }

    pub fn persona(&self) -> PersonaId {
        self.session().persona()
    }

    /// The active persona's full definition.
    pub fn active_persona(&self) -> Result<Persona, SessionError> {
        let id = self.persona();
        self.resolve_persona(id).cloned()
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.session().transcript().to_vec()
    }

    pub fn state(&self) -> TurnState {
        self.session().state()
    }

    pub fn is_processing(&self) -> bool {
        self.session().is_processing()
    }

    /// Observe the processing flag (true while a backend call is in flight).
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.processing.subscribe()
    }

    fn resolve_persona(&self, id: PersonaId) -> Result<&Persona, SessionError> {
        self.registry
            .get(id)
            .ok_or_else(|| SessionError::PersonaNotFound(id.to_string()))
    }
}

/// Completes an abandoned turn when `send` is dropped mid-flight, so the
/// session never stays in `Sending`.
struct TurnGuard<'a> {
    service: &'a ChatService,
    token: u64,
    armed: bool,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(token = self.token, "Turn cancelled before the model answered");
            let _ = self.service.finish(
                self.token,
                Err(GatewayError::Backend("turn cancelled".to_string())),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use tokio::sync::Notify;

    use castagents_types::chat::MessageRole;
    use castagents_types::error::SubmitRejected;
    use castagents_types::llm::{CompletionRequest, CompletionResponse, LlmError};
    use castagents_types::proposal::ProposalKind;
    use castagents_types::wallet::{Holding, WalletSnapshot};

    use super::*;
    use crate::agent::gateway::GatewaySettings;
    use crate::chat::session::BACKEND_FAILURE_REPLY;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::llm::provider::LlmProvider;
    use crate::wallet::StaticWallet;

    /// Stub provider: optionally waits for `release`, records the request,
    /// then replies with `reply`.
    #[derive(Clone)]
    struct StubProvider {
        reply: Result<String, String>,
        entered: Arc<Notify>,
        release: Option<Arc<Notify>>,
        seen: Arc<StdMutex<Vec<CompletionRequest>>>,
    }

    impl StubProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                entered: Arc::new(Notify::new()),
                release: None,
                seen: Arc::new(StdMutex::new(Vec::new())),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                ..Self::replying("")
            }
        }
    }

    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            self.entered.notify_one();
            if let Some(release) = &self.release {
                release.notified().await;
            }
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    text: Some(text.clone()),
                    model: request.model.clone(),
                    finish_reason: None,
                }),
                Err(message) => Err(LlmError::Provider {
                    message: message.clone(),
                }),
            }
        }
    }

    fn service(provider: StubProvider, wallet: WalletSnapshot, persona: PersonaId) -> ChatService {
        ChatService::new(
            Arc::new(PersonaRegistry::builtin()),
            Arc::new(ModelGateway::new(
                BoxLlmProvider::new(provider),
                GatewaySettings::default(),
            )),
            Arc::new(StaticWallet(wallet)),
            persona,
        )
    }

    fn mock_wallet() -> WalletSnapshot {
        WalletSnapshot::connected(
            "0x71C...9A23",
            vec![Holding {
                symbol: "ETH".to_string(),
                balance: 1.45,
                unit_price: 3200.0,
                value_usd: 4640.0,
                change_24h_pct: 2.5,
            }],
        )
    }

    #[tokio::test]
    async fn swap_answer_with_proposal() {
        let reply = "Relay.link gives the best route. Slippage 0.5%.\n\n```json\n\
            {\"type\":\"SWAP\",\"summary\":\"Swap 0.1 ETH for DEGEN via Relay\",\
            \"protocol\":\"Relay.link\",\"estimatedGas\":\"0.0004 ETH\",\"feeUsd\":1.23}\n```";
        let svc = service(StubProvider::replying(reply), mock_wallet(), PersonaId::SwapAgent);

        let message = svc.send("Swap 0.1 ETH to DEGEN").await.unwrap();

        assert_eq!(message.role(), MessageRole::Model);
        let proposal = message.proposal().unwrap();
        assert_eq!(proposal.kind, ProposalKind::Swap);
        assert!((proposal.fee_usd - 1.23).abs() < f64::EPSILON);
        assert!(!message.content().contains("```"));
        assert_eq!(
            message.content(),
            "Relay.link gives the best route. Slippage 0.5%."
        );
        assert_eq!(svc.transcript().len(), 2);
        assert!(!svc.is_processing());
    }

    #[tokio::test]
    async fn backend_error_yields_fixed_reply() {
        let svc = service(
            StubProvider::failing("HTTP 500"),
            mock_wallet(),
            PersonaId::SwapAgent,
        );
        let message = svc.send("Swap 0.1 ETH to DEGEN").await.unwrap();
        assert_eq!(message.content(), BACKEND_FAILURE_REPLY);
        assert!(message.proposal().is_none());
        assert_eq!(svc.state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn disconnected_wallet_reaches_the_prompt() {
        let provider = StubProvider::replying("Please connect your wallet.");
        let seen = provider.seen.clone();
        let svc = service(provider, WalletSnapshot::disconnected(), PersonaId::WalletAssistant);

        svc.send("Analyze my portfolio health").await.unwrap();

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system.contains("NOT connected"));
        assert!(!requests[0].system.contains("Tokens:"));
        assert!(requests[0].system.starts_with("You are an intelligent Web3 agent"));
        assert!(
            requests[0]
                .prompt
                .ends_with("\nUSER: Analyze my portfolio health")
        );
    }

    #[tokio::test]
    async fn prior_turns_are_sent_without_the_new_message() {
        let provider = StubProvider::replying("ok");
        let seen = provider.seen.clone();
        let svc = service(provider, mock_wallet(), PersonaId::WalletAssistant);

        svc.send("first").await.unwrap();
        svc.send("second").await.unwrap();

        let requests = seen.lock().unwrap();
        assert_eq!(
            requests[1].prompt,
            "Previous conversation:\nUSER: first\nMODEL: ok\n\nUSER: second"
        );
        assert!(requests[1].system.contains("Tokens: 1.45 ETH ($4640.00)"));
    }

    #[tokio::test]
    async fn user_message_is_appended_before_backend_call() {
        let release = Arc::new(Notify::new());
        let provider = StubProvider {
            release: Some(release.clone()),
            ..StubProvider::replying("done")
        };
        let entered = provider.entered.clone();
        let svc = Arc::new(service(provider, mock_wallet(), PersonaId::BridgeAgent));
        let mut processing = svc.subscribe();

        let task = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.send("Bridge ETH to Base").await })
        };
        entered.notified().await;

        // Mid-flight: user message visible, machine busy.
        let transcript = svc.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role(), MessageRole::User);
        assert!(svc.is_processing());
        assert!(*processing.borrow_and_update());

        assert_eq!(
            svc.send("another").await.unwrap_err(),
            SessionError::Rejected(SubmitRejected::Busy)
        );
        assert_eq!(
            svc.select_persona(PersonaId::YieldHunter).unwrap_err(),
            SessionError::PersonaSwitchWhileSending
        );
        assert_eq!(svc.transcript().len(), 1);

        release.notify_one();
        let message = task.await.unwrap().unwrap();
        assert_eq!(message.content(), "done");
        assert!(!svc.is_processing());
        assert!(!*processing.borrow_and_update());
    }

    #[tokio::test]
    async fn dropped_turn_returns_to_idle() {
        let provider = StubProvider {
            release: Some(Arc::new(Notify::new())),
            ..StubProvider::replying("never")
        };
        let svc = service(provider, mock_wallet(), PersonaId::SwapAgent);

        let result = tokio::time::timeout(Duration::from_millis(50), svc.send("swap")).await;
        assert!(result.is_err());

        assert!(!svc.is_processing());
        let transcript = svc.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].content(), BACKEND_FAILURE_REPLY);
    }

    #[tokio::test]
    async fn switching_persona_resets_transcript() {
        let svc = service(StubProvider::replying("hi"), mock_wallet(), PersonaId::SwapAgent);
        svc.send("hello").await.unwrap();
        assert_eq!(svc.transcript().len(), 2);

        svc.select_persona(PersonaId::ReputationAgent).unwrap();
        assert_eq!(svc.persona(), PersonaId::ReputationAgent);
        assert!(svc.transcript().is_empty());
        assert_eq!(svc.active_persona().unwrap().name, "Reputation Agent");
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let svc = service(StubProvider::replying("x"), mock_wallet(), PersonaId::SwapAgent);
        assert_eq!(
            svc.send("  ").await.unwrap_err(),
            SessionError::Rejected(SubmitRejected::BlankInput)
        );
        assert!(svc.transcript().is_empty());
    }

    #[tokio::test]
    async fn unknown_persona_is_rejected_before_submit() {
        let registry = PersonaRegistry::from_personas(vec![
            PersonaRegistry::builtin()
                .get(PersonaId::SwapAgent)
                .unwrap()
                .clone(),
        ]);
        let svc = ChatService::new(
            Arc::new(registry),
            Arc::new(ModelGateway::unconfigured("no key", GatewaySettings::default())),
            Arc::new(StaticWallet::default()),
            PersonaId::YieldHunter,
        );
        assert!(matches!(
            svc.send("hi").await,
            Err(SessionError::PersonaNotFound(_))
        ));
        assert!(svc.transcript().is_empty());
        assert!(svc.select_persona(PersonaId::BridgeAgent).is_err());
    }
}
