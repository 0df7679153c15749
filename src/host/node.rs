use crate::key::KeyOrigin;

const NODE_MASK: u64 = 0xFFFF_FFFF_FFFF;
/// Multicast bit of the first octet; marks a node id as not being a real MAC.
pub const MULTICAST_BIT: u64 = 0x0100_0000_0000;

/// 48-bit node id: the MAC address of a network interface as a big-endian
/// integer, or a random value with the multicast bit set when no MAC is
/// available.
pub fn node_id() -> (u64, KeyOrigin) {
    match mac_address::get_mac_address() {
        Ok(Some(mac)) => {
            let id = mac_to_node(mac.bytes());
            if id != 0 {
                return (id, KeyOrigin::NodeId);
            }
            tracing::debug!("MAC address is all zeros");
        }
        Ok(None) => tracing::debug!("no MAC address found"),
        Err(e) => tracing::debug!("failed to read MAC address: {}", e),
    }
    (random_node_id(), KeyOrigin::Random)
}

pub fn mac_to_node(bytes: [u8; 6]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

pub fn random_node_id() -> u64 {
    (rand::random::<u64>() & NODE_MASK) | MULTICAST_BIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_to_node_is_big_endian() {
        assert_eq!(mac_to_node([0x00, 0x1b, 0x63, 0x84, 0x45, 0xe6]), 0x001b_6384_45e6);
    }

    #[test]
    fn test_random_node_fits_48_bits_with_multicast() {
        for _ in 0..100 {
            let id = random_node_id();
            assert!(id <= NODE_MASK);
            assert_ne!(id & MULTICAST_BIT, 0);
        }
    }
}
