use log::trace;
use zerocopy::{NetworkEndian, U128, U32};

//------------ AddressFamily (trait) ----------------------------------------
//
/// The address family of an IP address as a Trait.
///
/// Each family has a separate type, so that a tree for one family only
/// takes the exact amount of memory needed per address. The prefix trie is
/// generic over this trait and keeps one tree per family.
pub trait AddressFamily:
    std::fmt::Debug
    + std::hash::Hash
    + std::fmt::Display
    + Eq
    + Copy
    + Ord
{
    /// The number of bits in the byte representation of the family.
    const BITS: u8;

    /// The std::net that the value of self belongs to. So,
    /// [std::net::Ipv4Addr], and [std::net::Ipv6Addr] for IPv4, and IPv6
    /// respectively.
    type InnerIpAddr;

    fn from_ipaddr(ip_addr: Self::InnerIpAddr) -> Self;

    fn zero() -> Self;

    /// fill the bits after the specified len with zeros. Interpreted as an IP
    /// Prefix, this means that self will be truncated to the specified len.
    fn truncate_to_len(self, len: u8) -> Self;

    /// Returns whether the bit at `pos` is set, counting from the most
    /// significant bit (position 0). Positions at or beyond `BITS` are
    /// never set.
    fn bit_at(self, pos: u8) -> bool;

    /// Turn self in to a [std::net::IpAddr].
    fn into_ipaddr(self) -> std::net::IpAddr;
}

//-------------- Ipv4 Type --------------------------------------------------

/// Exactly fitting IPv4 bytes (4 octets).
pub type IPv4 = U32<NetworkEndian>;

impl AddressFamily for IPv4 {
    const BITS: u8 = 32;
    type InnerIpAddr = std::net::Ipv4Addr;

    fn zero() -> Self {
        0.into()
    }

    fn from_ipaddr(ip_addr: Self::InnerIpAddr) -> Self {
        IPv4::from(ip_addr.octets())
    }

    fn truncate_to_len(self, len: u8) -> Self {
        // A shift by the full width is not defined, so a zero length
        // falls back to an all-zeros mask.
        let mask = u32::MAX
            .checked_shl(Self::BITS.saturating_sub(len) as u32)
            .unwrap_or(0);
        (u32::from(self) & mask).into()
    }

    fn bit_at(self, pos: u8) -> bool {
        if pos >= Self::BITS {
            trace!("bit_at {} out of range for IPv4", pos);
            return false;
        }
        (u32::from(self) >> (Self::BITS - 1 - pos)) & 1 == 1
    }

    fn into_ipaddr(self) -> std::net::IpAddr {
        std::net::IpAddr::V4(std::net::Ipv4Addr::from(u32::from(self)))
    }
}

//-------------- Ipv6 Type --------------------------------------------------

/// Exactly fitting IPv6 bytes (16 octets).
pub type IPv6 = U128<NetworkEndian>;

impl AddressFamily for IPv6 {
    const BITS: u8 = 128;
    type InnerIpAddr = std::net::Ipv6Addr;

    fn zero() -> Self {
        0.into()
    }

    fn from_ipaddr(ip_addr: Self::InnerIpAddr) -> Self {
        IPv6::from(ip_addr.octets())
    }

    fn truncate_to_len(self, len: u8) -> Self {
        let mask = u128::MAX
            .checked_shl(Self::BITS.saturating_sub(len) as u32)
            .unwrap_or(0);
        (u128::from(self) & mask).into()
    }

    fn bit_at(self, pos: u8) -> bool {
        if pos >= Self::BITS {
            trace!("bit_at {} out of range for IPv6", pos);
            return false;
        }
        (u128::from(self) >> (Self::BITS - 1 - pos)) & 1 == 1
    }

    fn into_ipaddr(self) -> std::net::IpAddr {
        std::net::IpAddr::V6(std::net::Ipv6Addr::from(u128::from(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ipv4() {
        let net = IPv4::from_ipaddr(std::net::Ipv4Addr::new(10, 1, 2, 3));
        assert_eq!(
            net.truncate_to_len(8).into_ipaddr(),
            std::net::IpAddr::from([10, 0, 0, 0])
        );
        assert_eq!(net.truncate_to_len(0), IPv4::zero());
        assert_eq!(net.truncate_to_len(32), net);
    }

    #[test]
    fn truncate_ipv6() {
        let net = IPv6::from_ipaddr("2001:db8:ffff::1".parse().unwrap());
        assert_eq!(
            net.truncate_to_len(32).into_ipaddr(),
            "2001:db8::".parse::<std::net::IpAddr>().unwrap()
        );
        assert_eq!(net.truncate_to_len(0), IPv6::zero());
        assert_eq!(net.truncate_to_len(128), net);
    }

    #[test]
    fn bits_from_the_top() {
        let net = IPv4::from_ipaddr(std::net::Ipv4Addr::new(128, 0, 0, 1));
        assert!(net.bit_at(0));
        assert!(!net.bit_at(1));
        assert!(net.bit_at(31));
        assert!(!net.bit_at(32));

        let net = IPv6::from_ipaddr("8000::".parse().unwrap());
        assert!(net.bit_at(0));
        assert!(!net.bit_at(127));
    }
}
