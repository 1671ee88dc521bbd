use crate::AddressFamily;

//------------ PrefixId ------------------------------------------------------

/// A prefix of a single address family, as stored in the prefix tree.
///
/// The network address is always kept truncated to the length, so two
/// `PrefixId`s for the same network compare equal.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone)]
pub struct PrefixId<AF: AddressFamily> {
    len: u8,
    net: AF,
}

impl<AF: AddressFamily> PrefixId<AF> {
    pub fn new(net: AF, len: u8) -> Self {
        PrefixId {
            len,
            net: net.truncate_to_len(len),
        }
    }

    pub fn get_net(&self) -> AF {
        self.net
    }

    pub fn get_len(&self) -> u8 {
        self.len
    }

    pub fn truncate_to_len(self, len: u8) -> Self {
        Self {
            net: self.net.truncate_to_len(len),
            len,
        }
    }

    /// Returns whether `self` covers `other`, i.e. `other` is equal to or
    /// more specific than `self`.
    pub fn covers(&self, other: &Self) -> bool {
        self.len <= other.len
            && other.net.truncate_to_len(self.len) == self.net
    }

    /// Returns whether `self` covers `other` and is not `other` itself.
    pub fn strictly_covers(&self, other: &Self) -> bool {
        self.len < other.len && self.covers(other)
    }
}

impl<AF: AddressFamily> std::fmt::Display for PrefixId<AF> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.net.into_ipaddr(), self.len)
    }
}

// There is no reasonable way for this to panic, PrefixId and inetnum's Prefix
// represent the same data in slightly different ways, and the network of a
// PrefixId is always truncated to its length.
#[allow(clippy::unwrap_used)]
impl<AF: AddressFamily> From<PrefixId<AF>> for inetnum::addr::Prefix {
    fn from(value: PrefixId<AF>) -> Self {
        Self::new(value.get_net().into_ipaddr(), value.get_len()).unwrap()
    }
}
