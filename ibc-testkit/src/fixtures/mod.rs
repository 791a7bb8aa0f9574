pub mod core;

use alloc::fmt::Debug;

use ibc_relay_core::handler::types::error::HandlerError;
use ibc_relay_core::primitives::prelude::*;

use crate::testapp::ibc::core::types::MockContext;

pub enum Expect {
    Success,
    Failure(Option<HandlerError>),
}

#[derive(Debug)]
pub struct Fixture<M: Debug> {
    pub ctx: MockContext,
    pub msg: M,
}

impl<M: Debug> Fixture<M> {
    pub fn generate_error_msg<T: Debug>(
        &self,
        expect: &Expect,
        process: &str,
        res: &Result<T, HandlerError>,
    ) -> String {
        let base_error = match expect {
            Expect::Success => "step failed!",
            Expect::Failure(_) => "step passed but was supposed to fail!",
        };
        format!(
            "{process} {base_error} /n {res:?} /n {:?} /n {:?}",
            &self.msg, &self.ctx
        )
    }
}
