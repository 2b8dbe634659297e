use crate::context::Context;
use crate::frame::Frame;

pub trait Executable {
    fn exec(self, ctx: &Context) -> Frame;
}
