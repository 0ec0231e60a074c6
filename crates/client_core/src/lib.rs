//! Client side of the storefront: the query boundary, the address-state
//! collaborator and the view state controller that ties them together.

pub mod address;
pub mod boundary;
pub mod controller;
pub mod error;
pub mod pagination;

pub use address::{AddressState, HistoryAddress};
pub use boundary::{HttpQueryBoundary, QueryBoundary};
pub use controller::{
    ControllerConfig, Disposition, FetchCompletion, ViewController, ViewEvent, ViewState,
    ViewStatus,
};
pub use error::FetchError;
pub use pagination::{empty_state_message, page_window, result_summary, PageLink};
