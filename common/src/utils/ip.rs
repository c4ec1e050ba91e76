use std::net::Ipv4Addr;

/// Builds the reverse-lookup name of an address, e.g. `1.1.168.192.in-addr.arpa`.
pub fn reverse_address_to_ptr(addr: &Ipv4Addr) -> String {
    let [a, b, c, d] = addr.octets();
    format!("{d}.{c}.{b}.{a}.in-addr.arpa")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ptr_name_reverses_octets() {
        let addr = Ipv4Addr::new(192, 168, 1, 10);
        assert_eq!(reverse_address_to_ptr(&addr), "10.1.168.192.in-addr.arpa");
    }
}
