//! Generated bindings for the transaction feed service.
//!
//! Message types carry serde derives (added at codegen time) so records can
//! be relayed to clients as JSON without a manual mapping layer.

tonic::include_proto!("txfeed");
