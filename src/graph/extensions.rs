use crate::graph::{node::StereoNode, through::Through};

pub trait StereoNodeExt: StereoNode + Sized {
    fn through<B: StereoNode>(self, next: B) -> Through<Self, B> {
        Through::new(self, next)
    }
}

impl<T: StereoNode> StereoNodeExt for T {}
