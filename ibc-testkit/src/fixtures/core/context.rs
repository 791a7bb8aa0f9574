use core::time::Duration;

use ibc_relay_core::client::types::Height;
use ibc_relay_core::commitment_types::commitment::CommitmentPrefix;
use ibc_relay_core::host::ClientParams;
use ibc_relay_core::primitives::prelude::*;
use ibc_relay_core::primitives::Timestamp;
use typed_builder::TypedBuilder;

use crate::testapp::ibc::core::types::{MockContext, DEFAULT_BLOCK_TIME_SECS};
use crate::utils::year_2023;

/// Configuration of the `MockContext` type for generating dummy contexts.
#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = MockContext))]
pub struct MockContextConfig {
    #[builder(default = Height::new(0, 5))]
    latest_height: Height,

    #[builder(default = year_2023())]
    latest_timestamp: Timestamp,

    #[builder(default = Duration::from_secs(DEFAULT_BLOCK_TIME_SECS))]
    block_time: Duration,

    #[builder(default = CommitmentPrefix::try_from(b"ibc".to_vec()).expect("Never fails"))]
    commitment_prefix: CommitmentPrefix,

    #[builder(default)]
    client_params: ClientParams,
}

impl From<MockContextConfig> for MockContext {
    fn from(params: MockContextConfig) -> Self {
        MockContext::new(
            params.latest_height,
            params.latest_timestamp,
            params.block_time,
            params.commitment_prefix,
            params.client_params,
        )
    }
}
