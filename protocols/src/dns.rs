//! Minimal DNS codec for reverse (PTR) lookups.

use std::net::Ipv4Addr;

use anyhow::Context;
use pnet::packet::dns::{
    DnsClass, DnsPacket, DnsQuery, DnsTypes, MutableDnsPacket, Opcode, Retcode,
};

use lansweep_common::utils::ip;

pub const DNS_HDR_LEN: usize = 12;
pub const DNS_PORT: u16 = 53;

/// Type, class, TTL and RDLENGTH following an answer's owner name.
const RR_FIXED_LEN: usize = 10;
/// QTYPE and QCLASS following a question name.
const Q_FIXED_LEN: usize = 4;
const MAX_POINTER_JUMPS: usize = 16;

/// Decodes a response into its transaction id and the first PTR name, if any.
///
/// A well-formed response without a PTR record (e.g. NXDOMAIN) yields `None`.
/// Owner names may be compressed or written out in full, so the answer
/// section is walked by hand instead of through pnet's fixed record layout.
pub fn get_hostname(payload: &[u8]) -> anyhow::Result<(u16, Option<String>)> {
    let dns = DnsPacket::new(payload).context("Failed to parse DNS packet")?;
    let transaction_id = dns.get_id();

    let mut cursor: usize = DNS_HDR_LEN;
    for _ in 0..dns.get_query_count() {
        cursor = skip_dns_name(payload, cursor).context("truncated DNS question")? + Q_FIXED_LEN;
    }

    let mut hostname: Option<String> = None;
    for _ in 0..dns.get_response_count() {
        let Some(record) = read_record(payload, cursor) else {
            break;
        };
        if record.rtype == DnsTypes::PTR.0 {
            hostname = decode_dns_name(payload, record.rdata_start)
                .filter(|name| !name.is_empty());
            if hostname.is_some() {
                break;
            }
        }
        cursor = record.next;
    }

    Ok((transaction_id, hostname))
}

pub fn create_ptr_packet(ip_addr: &Ipv4Addr, id: u16) -> anyhow::Result<Vec<u8>> {
    let query: DnsQuery = create_ptr_query(ip_addr);
    let q_fixed_len: usize = 4;
    let qlen: usize = query.qname.len() + q_fixed_len;
    let total: usize = DNS_HDR_LEN + qlen;
    let mut buffer: Vec<u8> = vec![0u8; total];

    {
        let mut dns: MutableDnsPacket =
            MutableDnsPacket::new(&mut buffer).context("creating dns header")?;
        dns.set_id(id);
        dns.set_is_response(0);
        dns.set_opcode(Opcode::StandardQuery);
        dns.set_is_authoriative(0);
        dns.set_is_truncated(0);
        dns.set_is_recursion_desirable(1);
        dns.set_is_recursion_available(0);
        dns.set_zero_reserved(0);
        dns.set_is_non_authenticated_data(0);
        dns.set_rcode(Retcode::NoError);
        dns.set_query_count(1);
        dns.set_response_count(0);
        dns.set_authority_rr_count(0);
        dns.set_additional_rr_count(0);
    }

    // The question section is written by hand after the fixed header.
    let mut cursor: usize = DNS_HDR_LEN;

    buffer[cursor..cursor + query.qname.len()].copy_from_slice(&query.qname);
    cursor += query.qname.len();

    let type_bytes: [u8; 2] = query.qtype.0.to_be_bytes();
    buffer[cursor..cursor + 2].copy_from_slice(&type_bytes);
    cursor += 2;

    let class_bytes: [u8; 2] = query.qclass.0.to_be_bytes();
    buffer[cursor..cursor + 2].copy_from_slice(&class_bytes);

    Ok(buffer)
}

struct Record {
    rtype: u16,
    rdata_start: usize,
    next: usize,
}

fn read_record(msg: &[u8], offset: usize) -> Option<Record> {
    let fixed_start = skip_dns_name(msg, offset)?;
    let fixed = msg.get(fixed_start..fixed_start + RR_FIXED_LEN)?;
    let rtype = u16::from_be_bytes([fixed[0], fixed[1]]);
    let rdlength = u16::from_be_bytes([fixed[8], fixed[9]]) as usize;

    let rdata_start = fixed_start + RR_FIXED_LEN;
    let next = rdata_start + rdlength;
    if next > msg.len() {
        return None;
    }
    Some(Record {
        rtype,
        rdata_start,
        next,
    })
}

/// Returns the offset just past the name starting at `offset`.
fn skip_dns_name(msg: &[u8], mut offset: usize) -> Option<usize> {
    loop {
        let len = *msg.get(offset)? as usize;
        match len & 0xC0 {
            0x00 if len == 0 => return Some(offset + 1),
            0x00 => offset += 1 + len,
            // a pointer always ends the name
            0xC0 => return msg.get(offset + 1).map(|_| offset + 2),
            _ => return None,
        }
    }
}

fn create_ptr_query(ip_addr: &Ipv4Addr) -> DnsQuery {
    let ptr_string: String = ip::reverse_address_to_ptr(ip_addr);
    DnsQuery {
        qname: encode_dns_name(&ptr_string),
        qtype: DnsTypes::PTR,
        qclass: DnsClass(1),
        payload: Vec::new(),
    }
}

pub fn encode_dns_name(name: &str) -> Vec<u8> {
    let mut encoded: Vec<u8> = Vec::new();
    for label in name.split('.') {
        if label.is_empty() {
            continue;
        }
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    encoded
}

/// Reads the name at `offset` in `msg`, following compression pointers.
fn decode_dns_name(msg: &[u8], mut offset: usize) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    let mut jumps: usize = 0;
    loop {
        let len: usize = *msg.get(offset)? as usize;
        match len & 0xC0 {
            0x00 if len == 0 => break,
            0x00 => {
                let label = msg.get(offset + 1..offset + 1 + len)?;
                parts.push(std::str::from_utf8(label).ok()?);
                offset += 1 + len;
            }
            0xC0 => {
                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return None;
                }
                let low: usize = *msg.get(offset + 1)? as usize;
                offset = ((len & 0x3F) << 8) | low;
            }
            _ => return None,
        }
    }
    Some(parts.join("."))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
