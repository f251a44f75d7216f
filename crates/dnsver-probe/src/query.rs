use std::str::FromStr;

use dnsver_core::{Opcode, ProbeDefinition, QueryClass, QueryOption};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::opt::{EdnsCode, EdnsOption};
use hickory_proto::rr::{DNSClass, Name, RecordType};

use crate::catalog::DEFAULT_QNAME;
use crate::error::{ProbeError, ProbeResult};

/// Advertised EDNS UDP payload size
const EDNS_PAYLOAD: u16 = 1232;

/// Build the DNS message for a probe.
///
/// DO, NSID and COOKIE need an OPT record; when the probe carries one of
/// them without an EDNS version, version 0 is used.
pub fn build_query(probe: &ProbeDefinition, id: u16) -> ProbeResult<Message> {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query);

    let mut target = None;
    let mut edns_version = None;
    let mut dnssec_ok = false;
    let mut nsid = false;
    let mut cookie = false;

    for option in probe.options() {
        match option {
            QueryOption::Target {
                qname,
                qclass,
                qtype,
            } => target = Some((qname.as_str(), *qclass, qtype.as_str())),
            QueryOption::Opcode(opcode) => {
                message.set_op_code(match opcode {
                    Opcode::Query => OpCode::Query,
                    Opcode::Status => OpCode::Status,
                    Opcode::Notify => OpCode::Notify,
                });
            }
            QueryOption::RecursionDesired => {
                message.set_recursion_desired(true);
            }
            QueryOption::CheckingDisabled => {
                message.set_checking_disabled(true);
            }
            QueryOption::AuthenticData => {
                message.set_authentic_data(true);
            }
            QueryOption::Edns(version) => edns_version = Some(*version),
            QueryOption::DnssecOk => dnssec_ok = true,
            QueryOption::Nsid => nsid = true,
            QueryOption::Cookie => cookie = true,
        }
    }

    let (qname, qclass, qtype) = target.unwrap_or((DEFAULT_QNAME, QueryClass::In, "A"));
    let name = Name::from_ascii(qname)
        .map_err(|e| ProbeError::InvalidOption(format!("query name {qname:?}: {e}")))?;
    let record_type = RecordType::from_str(qtype)
        .map_err(|e| ProbeError::InvalidOption(format!("query type {qtype:?}: {e}")))?;

    let mut query = Query::query(name, record_type);
    query.set_query_class(match qclass {
        QueryClass::In => DNSClass::IN,
        QueryClass::Ch => DNSClass::CH,
    });
    message.add_query(query);

    if edns_version.is_some() || dnssec_ok || nsid || cookie {
        let mut edns = Edns::new();
        edns.set_version(edns_version.unwrap_or(0))
            .set_max_payload(EDNS_PAYLOAD)
            .set_dnssec_ok(dnssec_ok);
        if nsid {
            edns.options_mut()
                .insert(EdnsOption::Unknown(u16::from(EdnsCode::NSID), Vec::new()));
        }
        if cookie {
            edns.options_mut().insert(EdnsOption::Unknown(
                u16::from(EdnsCode::Cookie),
                client_cookie(id).to_vec(),
            ));
        }
        message.set_edns(edns);
    }

    Ok(message)
}

// 8-byte client cookie derived from the query id.
fn client_cookie(id: u16) -> [u8; 8] {
    u64::from(id).wrapping_mul(0x9E37_79B9_7F4A_7C15).to_be_bytes()
}
