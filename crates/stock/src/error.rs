use thiserror::Error;

use larder_shipping::CalculatorError;

/// Failures of the allocation pipeline.
///
/// Running short of stock, a calculator declining to quote, or a package with no
/// eligible shipping methods are normal outcomes and never show up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// A pluggable calculator failed; passed through unchanged.
    #[error(transparent)]
    Calculator(#[from] CalculatorError),
}
