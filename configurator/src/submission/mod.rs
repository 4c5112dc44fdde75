//! Order submission
//!
//! Builds the [`Submission`] record (total plus ordered labeled options) and
//! hands it to the external sink.

pub mod projector;

pub use projector::project_options;

use crate::catalog::Catalog;
use crate::pricing::{PriceBreakdown, SpecPricePolicy, calculate_price};
use crate::wizard::SelectionMachine;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{REFERENCE_IMAGE_KEY, Submission};

/// Build the submission record
///
/// Refuses while no specification is chosen: such an order has no price.
pub fn build_submission(
    catalog: &Catalog,
    machine: &SelectionMachine,
    policy: SpecPricePolicy,
    reference_image_url: Option<&str>,
) -> AppResult<Submission> {
    let price: PriceBreakdown =
        calculate_price(catalog, machine.state(), machine.sticky_case_group(), policy);
    if !price.has_specification {
        return Err(AppError::new(ErrorCode::SpecificationMissing));
    }

    let mut options = project_options(catalog, machine);
    if let Some(url) = reference_image_url.filter(|u| !u.trim().is_empty()) {
        options.push(REFERENCE_IMAGE_KEY, url);
    }
    Ok(Submission {
        total: price.total,
        options,
    })
}
