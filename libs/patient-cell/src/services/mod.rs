mod care;

pub use care::CareLedgerService;
