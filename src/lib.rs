// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive tool.
//
// Module responsibilities:
// - `api`: HTTP calls to the rewards endpoint (list items, purchase) and
//   the JSON envelopes they return.
// - `config`: command line flags and their environment fallbacks.
// - `error`: error type for the HTTP layer.
// - `input`: background console reader and the cancel sentinel.
// - `poller`: the fixed-interval purchase loop for one item.
// - `ui`: the listing / selection / polling cycle shown to the user.
pub mod api;
pub mod config;
pub mod error;
pub mod input;
pub mod poller;
pub mod ui;
