//! Application state wiring all services together.
//!
//! AppState holds the shared pieces used by both CLI commands and REST API
//! handlers: the persona registry, the model gateway, the simulated wallet
//! and the in-memory table of live chat sessions.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use uuid::Uuid;

use castagents_core::agent::gateway::ModelGateway;
use castagents_core::chat::ChatService;
use castagents_core::persona::PersonaRegistry;
use castagents_core::wallet::WalletSource;
use castagents_infra::config::{load_config_file, load_global_config, resolve_api_key};
use castagents_infra::filesystem::resolve_data_dir;
use castagents_infra::llm::build_gateway;
use castagents_infra::wallet::MockWalletProvider;
use castagents_types::config::GlobalConfig;
use castagents_types::persona::PersonaId;

/// Shared application state.
///
/// Cheap to clone: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GlobalConfig>,
    pub registry: Arc<PersonaRegistry>,
    pub gateway: Arc<ModelGateway>,
    pub wallet: Arc<MockWalletProvider>,
    /// Live HTTP chat sessions. In-memory only; lost on restart.
    pub sessions: Arc<DashMap<Uuid, Arc<ChatService>>>,
}

impl AppState {
    /// Initialize the application state: load config, resolve the API key,
    /// wire the gateway and the wallet.
    ///
    /// A missing API key is not fatal here; the gateway answers every turn
    /// with a configuration error instead.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => load_config_file(path).await,
            None => load_global_config(&resolve_data_dir()).await,
        };

        let gateway = build_gateway(&config.gateway, resolve_api_key(&config.gateway));
        let state = Self::new(config, gateway);

        if state.config.wallet.auto_connect {
            state.wallet.connect().await;
        }

        Ok(state)
    }

    /// Assemble state from already-built parts.
    pub fn new(config: GlobalConfig, gateway: ModelGateway) -> Self {
        let wallet = MockWalletProvider::new(Duration::from_millis(config.wallet.connect_delay_ms));
        Self {
            config: Arc::new(config),
            registry: Arc::new(PersonaRegistry::builtin()),
            gateway: Arc::new(gateway),
            wallet: Arc::new(wallet),
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Build a chat service bound to the shared registry, gateway and wallet.
    pub fn chat_service(&self, persona: PersonaId) -> ChatService {
        let wallet: Arc<dyn WalletSource> = self.wallet.clone();
        ChatService::new(
            self.registry.clone(),
            self.gateway.clone(),
            wallet,
            persona,
        )
    }

    /// Register a new HTTP session and return its id.
    pub fn open_session(&self, persona: PersonaId) -> (Uuid, Arc<ChatService>) {
        let id = Uuid::now_v7();
        let service = Arc::new(self.chat_service(persona));
        self.sessions.insert(id, service.clone());
        tracing::debug!(session_id = %id, %persona, "Session opened");
        (id, service)
    }

    pub fn session(&self, id: &Uuid) -> Option<Arc<ChatService>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn close_session(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Resolve a persona from user input (`swap-agent`, `SWAP_AGENT`, ...).
    pub fn resolve_persona(&self, input: &str) -> Option<PersonaId> {
        self.registry.find(input).map(|p| p.id)
    }
}
