//! Composition root: turns a [`Config`] into wired components.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::ebay::EbayClient;
use crate::adapter::outbound::memory::MemoryDedupStore;
use crate::adapter::outbound::sqlite::{self, SqliteDedupStore};
use crate::adapter::outbound::token::EnvTokenProvider;
use crate::adapter::outbound::vinted::VintedClient;
use crate::adapter::outbound::whatsapp::WhatsAppSender;
use crate::application::normalize::{FeeSchedule, Normalizer};
use crate::application::notify::{AlertNotifier, RateLimiter};
use crate::application::pipeline::Pipeline;
use crate::application::rules::{RiskPolicy, RuleBook, SharedRuleBook};
use crate::application::scheduler::{Scheduler, SchedulerSettings};
use crate::domain::id::Source;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::rules::{load_rules, RuleFile};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::dedup::DedupStore;
use crate::port::outbound::messaging::MessageSender;
use crate::port::outbound::source::SourceRegistry;
use crate::port::outbound::token::TokenProvider;

const IN_MEMORY: &str = ":memory:";

/// Open the dedup store named by `config.database`.
///
/// `:memory:` selects the in-process store; anything else is a SQLite file.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn build_dedup_store(config: &Config) -> Result<Arc<dyn DedupStore>> {
    let policy = config.alerts.lease_policy();
    if config.database == IN_MEMORY {
        warn!("Using in-memory dedup store, alert history will not survive a restart");
        return Ok(Arc::new(MemoryDedupStore::new(policy)));
    }
    let pool = sqlite::open(&config.database)?;
    info!(path = %config.database, "Dedup database ready");
    Ok(Arc::new(SqliteDedupStore::new(pool, policy)))
}

/// Register every enabled marketplace.
///
/// # Errors
/// Returns an error if a source's settings cannot produce a client.
pub fn build_sources(config: &Config) -> Result<SourceRegistry> {
    let mut registry = SourceRegistry::new();

    let ebay = &config.sources.ebay;
    if ebay.enabled {
        let tokens = EnvTokenProvider::new(&ebay.token_env);
        if !tokens.is_set() {
            warn!(var = %ebay.token_env, "eBay token not set, eBay fetches will fail");
        }
        registry.register(Arc::new(EbayClient::new(ebay.clone(), Arc::new(tokens))));
    }

    let vinted = &config.sources.vinted;
    if vinted.enabled {
        let cookie = EnvTokenProvider::new(&vinted.cookie_env);
        let cookie: Option<Arc<dyn TokenProvider>> = if cookie.is_set() {
            Some(Arc::new(cookie))
        } else {
            None
        };
        registry.register(Arc::new(VintedClient::new(vinted.clone(), cookie)?));
    }

    info!(sources = registry.len(), "Sources registered");
    Ok(registry)
}

#[must_use]
pub fn build_normalizer(config: &Config) -> Normalizer {
    Normalizer::new(&config.search.currency)
        .with_fee_schedule(Source::Ebay, config.sources.ebay.fee_schedule())
        .with_fee_schedule(Source::Vinted, config.sources.vinted.fee_schedule())
        .with_fee_schedule(Source::Manual, FeeSchedule::none())
}

/// Load the rules file once, without change tracking.
///
/// # Errors
/// Returns an error if the rules file is unreadable or invalid.
pub fn build_rule_book(config: &Config) -> Result<RuleBook> {
    load_rules(&config.rules_path, RiskPolicy::from(&config.risk))
}

/// WhatsApp sender authenticated from the configured token variable.
///
/// # Errors
/// Returns [`ConfigError::MissingField`] when no phone number id is configured.
pub fn build_sender(config: &Config) -> Result<Arc<dyn MessageSender>> {
    let phone_number_id = config
        .whatsapp
        .resolve_phone_number_id()
        .ok_or(ConfigError::MissingField {
            field: "whatsapp.phone_number_id",
        })?;
    let tokens = EnvTokenProvider::new(&config.whatsapp.token_env);
    if !tokens.is_set() {
        return Err(ConfigError::MissingEnv {
            name: config.whatsapp.token_env.clone(),
        }
        .into());
    }
    Ok(Arc::new(WhatsAppSender::new(
        &config.whatsapp,
        &phone_number_id,
        Arc::new(tokens),
    )))
}

#[must_use]
pub fn build_notifier(config: &Config, sender: Arc<dyn MessageSender>) -> Arc<AlertNotifier> {
    Arc::new(AlertNotifier::new(
        sender,
        Arc::new(RateLimiter::new(config.alerts.rate_limit_per_minute)),
        config.alerts.retry_policy(),
    ))
}

/// Pipeline over the given rules, store and sender.
///
/// # Errors
/// Returns an error if the alert recipient is missing or malformed.
pub fn build_pipeline(
    config: &Config,
    rules: SharedRuleBook,
    store: Arc<dyn DedupStore>,
    sender: Arc<dyn MessageSender>,
) -> Result<Pipeline> {
    let recipient = config.alerts.resolve_recipient()?;
    Ok(Pipeline::new(
        rules,
        store,
        build_notifier(config, sender),
        recipient,
        config.alerts.profit_threshold,
    ))
}

/// Fully wired scheduler plus the store it writes to.
pub struct App {
    pub scheduler: Scheduler,
    pub store: Arc<dyn DedupStore>,
}

/// Wire every component for a polling run.
///
/// # Errors
/// Returns an error if any component cannot be built.
pub fn build_app(config: &Config) -> Result<App> {
    let (rule_file, book) = RuleFile::open(&config.rules_path, RiskPolicy::from(&config.risk))?;
    info!(
        path = %rule_file.path().display(),
        rules = book.engine.rules().len(),
        brands = book.vocabulary.brand_count(),
        models = book.vocabulary.model_count(),
        "Rules loaded"
    );

    let store = build_dedup_store(config)?;
    let sender = build_sender(config)?;
    let pipeline = build_pipeline(
        config,
        SharedRuleBook::new(book),
        Arc::clone(&store),
        sender,
    )?;

    let scheduler = Scheduler::new(
        build_sources(config)?,
        config.search.query(),
        build_normalizer(config),
        Arc::new(pipeline),
        SchedulerSettings::from(&config.scheduler),
    )
    .with_rule_source(Arc::new(rule_file));

    Ok(App { scheduler, store })
}
