//! Conversation session state machine.
//!
//! The session owns the transcript for exactly one persona and serializes
//! turns: a submission is accepted only while `Idle`, moves the machine to
//! `Sending` with a fresh turn token, and the matching completion brings it
//! back to `Idle`. Completions carrying any other token are discarded.
//!
//! Every transition is also reachable through [`ConversationSession::apply`],
//! which takes a [`SessionEvent`] and reports a [`SessionEffect`] so callers
//! and tests can drive the machine without a UI.

use castagents_types::chat::{ChatMessage, TurnState};
use castagents_types::error::{SessionError, SubmitRejected};
use castagents_types::llm::GatewayError;
use castagents_types::persona::PersonaId;

use crate::agent::proposal::Extraction;

/// Reply appended when the backend call fails.
pub const BACKEND_FAILURE_REPLY: &str =
    "I encountered an error connecting to the intelligence network. Please try again.";

/// Reply appended when no API credential is configured.
pub const CONFIGURATION_FAILURE_REPLY: &str =
    "Error: API Key not found in environment. Please check setup.";

/// Work handed to the turn driver after a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    pub token: u64,
    pub persona: PersonaId,
    /// Transcript messages preceding the new user message.
    pub prior_turns: Vec<ChatMessage>,
    pub user_text: String,
}

/// Inputs to the state machine.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Submit(String),
    Completed {
        token: u64,
        outcome: Result<Extraction, GatewayError>,
    },
    SelectPersona(PersonaId),
}

/// What a transition produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Run the backend call for this turn, then feed back `Completed`.
    CallModel(PendingTurn),
    Appended(ChatMessage),
    PersonaChanged(PersonaId),
    Rejected(SessionError),
}

/// Turn-taking state machine and transcript owner.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    persona: PersonaId,
    transcript: Vec<ChatMessage>,
    state: TurnState,
    last_token: u64,
}

impl ConversationSession {
    pub fn new(persona: PersonaId) -> Self {
        Self {
            persona,
            transcript: Vec::new(),
            state: TurnState::Idle,
            last_token: 0,
        }
    }

    pub fn persona(&self) -> PersonaId {
        self.persona
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// True while a backend call is in flight.
    pub fn is_processing(&self) -> bool {
        self.state.is_sending()
    }

    /// Accept user text and start a turn.
    ///
    /// The user message is appended before this returns, so it is in the
    /// transcript before any backend interaction starts.
    pub fn submit(&mut self, text: &str) -> Result<PendingTurn, SubmitRejected> {
        if self.state.is_sending() {
            return Err(SubmitRejected::Busy);
        }
        if text.trim().is_empty() {
            return Err(SubmitRejected::BlankInput);
        }

        let prior_turns = self.transcript.clone();
        self.transcript.push(ChatMessage::user(text));

        self.last_token += 1;
        let token = self.last_token;
        self.state = TurnState::Sending { token };
        tracing::debug!(token, persona = %self.persona, "Turn started");

        Ok(PendingTurn {
            token,
            persona: self.persona,
            prior_turns,
            user_text: text.to_string(),
        })
    }

    /// Finish the in-flight turn identified by `token`.
    ///
    /// Success appends the extracted answer; failure appends a fixed reply
    /// with no proposal. Either way the machine returns to `Idle`.
    pub fn complete(
        &mut self,
        token: u64,
        outcome: Result<Extraction, GatewayError>,
    ) -> Result<&ChatMessage, SessionError> {
        match self.state {
            TurnState::Sending { token: current } if current == token => {}
            _ => {
                tracing::debug!(token, state = %self.state, "Discarding stale completion");
                return Err(SessionError::StaleCompletion { token });
            }
        }

        let message = match outcome {
            Ok(extraction) => ChatMessage::model(extraction.display_text, extraction.proposal),
            Err(GatewayError::Configuration(reason)) => {
                tracing::warn!(%reason, "Model gateway is not configured");
                ChatMessage::model(CONFIGURATION_FAILURE_REPLY, None)
            }
            Err(GatewayError::Backend(reason)) => {
                tracing::warn!(%reason, "Model gateway call failed");
                ChatMessage::model(BACKEND_FAILURE_REPLY, None)
            }
        };

        self.transcript.push(message);
        self.state = TurnState::Idle;
        tracing::debug!(token, "Turn finished");

        Ok(&self.transcript[self.transcript.len() - 1])
    }

    /// Switch persona. Only allowed while `Idle`; clears the transcript.
    pub fn select_persona(&mut self, persona: PersonaId) -> Result<(), SessionError> {
        if self.state.is_sending() {
            return Err(SessionError::PersonaSwitchWhileSending);
        }
        tracing::debug!(from = %self.persona, to = %persona, "Switching persona");
        self.persona = persona;
        self.transcript.clear();
        Ok(())
    }

    /// Feed one event through the machine.
    pub fn apply(&mut self, event: SessionEvent) -> SessionEffect {
        match event {
            SessionEvent::Submit(text) => match self.submit(&text) {
                Ok(turn) => SessionEffect::CallModel(turn),
                Err(rejected) => SessionEffect::Rejected(rejected.into()),
            },
            SessionEvent::Completed { token, outcome } => match self.complete(token, outcome) {
                Ok(message) => SessionEffect::Appended(message.clone()),
                Err(err) => SessionEffect::Rejected(err),
            },
            SessionEvent::SelectPersona(persona) => match self.select_persona(persona) {
                Ok(()) => SessionEffect::PersonaChanged(persona),
                Err(err) => SessionEffect::Rejected(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use castagents_types::chat::MessageRole;
    use castagents_types::proposal::{Proposal, ProposalKind};

    use super::*;

    fn answer(text: &str) -> Result<Extraction, GatewayError> {
        Ok(Extraction {
            display_text: text.to_string(),
            proposal: None,
        })
    }

    fn swap_proposal() -> Proposal {
        Proposal {
            kind: ProposalKind::Swap,
            summary: "Swap 0.1 ETH for DEGEN".to_string(),
            steps: None,
            data: serde_json::Value::Null,
            estimated_gas: "0.0004 ETH".to_string(),
            fee_usd: 1.23,
            protocol: Some("Relay.link".to_string()),
        }
    }

    #[test]
    fn submit_appends_user_message_and_enters_sending() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        let turn = session.submit("  Swap 0.1 ETH to DEGEN ").unwrap();

        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role(), MessageRole::User);
        assert_eq!(session.transcript()[0].content(), "  Swap 0.1 ETH to DEGEN ");
        assert!(session.is_processing());
        assert_eq!(session.state(), TurnState::Sending { token: turn.token });
        assert!(turn.prior_turns.is_empty());
        assert_eq!(turn.user_text, "  Swap 0.1 ETH to DEGEN ");
        assert_eq!(turn.persona, PersonaId::SwapAgent);
    }

    #[test]
    fn blank_submission_is_rejected() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        assert_eq!(session.submit("   \n").unwrap_err(), SubmitRejected::BlankInput);
        assert!(session.transcript().is_empty());
        assert!(!session.is_processing());
    }

    #[test]
    fn submit_while_sending_is_noop() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        session.submit("first").unwrap();
        assert_eq!(session.submit("second").unwrap_err(), SubmitRejected::Busy);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn rejected_events_while_sending_leave_transcript_alone() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        let turn = session.submit("first").unwrap();
        let before = session.transcript().to_vec();

        for event in [
            SessionEvent::Submit("second".into()),
            SessionEvent::SelectPersona(PersonaId::BridgeAgent),
            SessionEvent::Completed {
                token: turn.token + 1,
                outcome: answer("late"),
            },
        ] {
            assert!(matches!(session.apply(event), SessionEffect::Rejected(_)));
        }

        assert_eq!(session.transcript(), before.as_slice());
        assert_eq!(session.persona(), PersonaId::SwapAgent);
        assert!(session.is_processing());
    }

    #[test]
    fn completion_appends_model_message_with_proposal() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        let turn = session.submit("swap").unwrap();
        let outcome = Ok(Extraction {
            display_text: "Route found.".to_string(),
            proposal: Some(swap_proposal()),
        });

        let message = session.complete(turn.token, outcome).unwrap().clone();
        assert_eq!(message.role(), MessageRole::Model);
        assert_eq!(message.content(), "Route found.");
        assert_eq!(message.proposal(), Some(&swap_proposal()));
        assert_eq!(session.state(), TurnState::Idle);
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn backend_failure_appends_fixed_reply() {
        let mut session = ConversationSession::new(PersonaId::BridgeAgent);
        let turn = session.submit("bridge").unwrap();
        let message = session
            .complete(turn.token, Err(GatewayError::Backend("HTTP 503".to_string())))
            .unwrap();
        assert_eq!(message.content(), BACKEND_FAILURE_REPLY);
        assert!(message.proposal().is_none());
        assert!(!session.is_processing());
    }

    #[test]
    fn configuration_failure_appends_setup_reply() {
        let mut session = ConversationSession::new(PersonaId::BridgeAgent);
        let turn = session.submit("bridge").unwrap();
        let message = session
            .complete(turn.token, Err(GatewayError::Configuration("no key".to_string())))
            .unwrap();
        assert_eq!(message.content(), CONFIGURATION_FAILURE_REPLY);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        let first = session.submit("one").unwrap();
        session.complete(first.token, answer("reply one")).unwrap();
        let second = session.submit("two").unwrap();

        let err = session.complete(first.token, answer("late")).unwrap_err();
        assert_eq!(err, SessionError::StaleCompletion { token: first.token });
        assert_eq!(session.transcript().len(), 3);
        assert!(session.is_processing());

        session.complete(second.token, answer("reply two")).unwrap();
        assert_eq!(session.transcript().len(), 4);
    }

    #[test]
    fn completion_while_idle_is_discarded() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        assert!(session.complete(1, answer("ghost")).is_err());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn tokens_are_monotonic() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        let a = session.submit("a").unwrap();
        session.complete(a.token, answer("x")).unwrap();
        let b = session.submit("b").unwrap();
        assert!(b.token > a.token);
        assert_eq!(b.prior_turns.len(), 2);
    }

    #[test]
    fn persona_switch_clears_transcript() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        let turn = session.submit("swap").unwrap();
        session
            .complete(
                turn.token,
                Ok(Extraction {
                    display_text: "ok".to_string(),
                    proposal: Some(swap_proposal()),
                }),
            )
            .unwrap();

        session.select_persona(PersonaId::YieldHunter).unwrap();
        assert_eq!(session.persona(), PersonaId::YieldHunter);
        assert!(session.transcript().is_empty());
        assert!(session.transcript().iter().all(|m| m.proposal().is_none()));
    }

    #[test]
    fn persona_switch_rejected_while_sending() {
        let mut session = ConversationSession::new(PersonaId::SwapAgent);
        session.submit("swap").unwrap();
        assert_eq!(
            session.select_persona(PersonaId::YieldHunter).unwrap_err(),
            SessionError::PersonaSwitchWhileSending
        );
        assert_eq!(session.persona(), PersonaId::SwapAgent);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn apply_drives_a_full_turn() {
        let mut session = ConversationSession::new(PersonaId::WalletAssistant);

        let SessionEffect::CallModel(turn) = session.apply(SessionEvent::Submit("hi".into())) else {
            panic!("expected CallModel");
        };
        assert!(matches!(
            session.apply(SessionEvent::Submit("again".into())),
            SessionEffect::Rejected(SessionError::Rejected(SubmitRejected::Busy))
        ));

        let effect = session.apply(SessionEvent::Completed {
            token: turn.token,
            outcome: answer("hello"),
        });
        let SessionEffect::Appended(message) = effect else {
            panic!("expected Appended");
        };
        assert_eq!(message.content(), "hello");

        assert_eq!(
            session.apply(SessionEvent::SelectPersona(PersonaId::AirdropScout)),
            SessionEffect::PersonaChanged(PersonaId::AirdropScout)
        );
        assert!(session.transcript().is_empty());
    }
}
