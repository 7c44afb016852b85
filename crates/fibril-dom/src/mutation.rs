use bitflags::bitflags;

use crate::NodeId;

bitflags! {
    /// Which mutation kinds a `Document` records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MutationKinds: u8 {
        const CREATE = 1 << 0;
        const PROPERTY = 1 << 1;
        const LISTENER = 1 << 2;
        const TREE = 1 << 3;
        const DISPOSE = 1 << 4;

        /// Everything that changes what the document displays or does.
        const VISIBLE = Self::PROPERTY.bits() | Self::LISTENER.bits() | Self::TREE.bits();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create { node: NodeId, tag: String },
    SetProperty { node: NodeId, name: String },
    ClearProperty { node: NodeId, name: String },
    AddListener { node: NodeId, event: String },
    RemoveListener { node: NodeId, event: String },
    AppendChild { parent: NodeId, child: NodeId },
    InsertBefore { parent: NodeId, child: NodeId, before: NodeId },
    RemoveChild { parent: NodeId, child: NodeId },
    Dispose { node: NodeId },
}

impl Mutation {
    pub fn kind(&self) -> MutationKinds {
        match self {
            Mutation::Create { .. } => MutationKinds::CREATE,
            Mutation::SetProperty { .. } | Mutation::ClearProperty { .. } => {
                MutationKinds::PROPERTY
            }
            Mutation::AddListener { .. } | Mutation::RemoveListener { .. } => {
                MutationKinds::LISTENER
            }
            Mutation::AppendChild { .. }
            | Mutation::InsertBefore { .. }
            | Mutation::RemoveChild { .. } => MutationKinds::TREE,
            Mutation::Dispose { .. } => MutationKinds::DISPOSE,
        }
    }
}
