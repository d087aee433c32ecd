pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use domain::{
    Chain, ChainId, ChainStatus, Decimal, Direction, OptionKind, Snapshot, StrategyKind, Symbol,
    Transaction, TransactionId, TransactionStatus,
};
pub use engine::{
    build_report, transaction_metrics, AnnualizationMethod, AnnualizedRoR, EngineSettings,
    PerformanceReport,
};
pub use error::AppError;
