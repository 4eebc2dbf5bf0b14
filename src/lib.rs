pub mod config;
pub mod dates;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod mortgage;
pub mod payments;
pub mod types;

// re-export key types
pub use config::{LoanTerms, ScheduleParams, DEFAULT_BALANCE_EPSILON};
pub use decimal::{Money, Rate};
pub use errors::{MortgageError, Result};
pub use events::{Event, EventStore};
pub use interest::{AccrualEngine, DayCountConvention, InterestCalculation, InterestCalculator};
pub use mortgage::{calculate_mortgage, MortgageSummary};
pub use payments::{
    generate_amortization_schedule, AmortizationCalculator, AmortizationResult, Installment, ScheduleEntry,
    ScheduleSummary,
};
pub use types::{ExtraPayment, PaymentId, PaymentType, RecalculationPolicy, RegularPayment};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
