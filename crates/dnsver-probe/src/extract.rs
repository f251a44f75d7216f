use dnsver_core::Signature;
use hickory_proto::op::Message;
use hickory_proto::rr::rdata::opt::EdnsCode;

/// Reduce a response to the attributes that distinguish DNS software.
#[must_use]
pub fn extract_signature(response: &Message) -> Signature {
    let mut signature = Signature::new();
    let header = response.header();

    signature.insert("rcode", u16::from(response.response_code()));
    signature.insert("opcode", u8::from(response.op_code()));
    signature.insert("aa", header.authoritative());
    signature.insert("tc", header.truncated());
    signature.insert("rd", header.recursion_desired());
    signature.insert("ra", header.recursion_available());
    signature.insert("ad", header.authentic_data());
    signature.insert("cd", header.checking_disabled());
    signature.insert("an", header.answer_count());
    signature.insert("ns", header.name_server_count());
    signature.insert("ar", header.additional_count());

    let mut types: Vec<String> = response
        .answers()
        .iter()
        .map(|record| record.record_type().to_string())
        .collect();
    types.sort();
    types.dedup();
    signature.insert("answer_types", types.join(","));

    match response.extensions() {
        Some(edns) => {
            signature.insert("edns", true);
            signature.insert("edns_version", edns.version());
            signature.insert("edns_do", edns.flags().dnssec_ok);
            signature.insert("edns_udp", edns.max_payload());
            signature.insert("nsid", edns.option(EdnsCode::NSID).is_some());
            signature.insert("cookie", edns.option(EdnsCode::Cookie).is_some());
        }
        None => signature.insert("edns", false),
    }

    signature
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsver_core::SignatureValue;
    use hickory_proto::op::{Edns, MessageType, OpCode, Query, ResponseCode};
    use hickory_proto::rr::rdata::opt::EdnsOption;
    use hickory_proto::rr::rdata::TXT;
    use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};

    fn version_response() -> Message {
        let name = Name::from_ascii("version.bind.").unwrap();
        let mut query = Query::query(name.clone(), RecordType::TXT);
        query.set_query_class(DNSClass::CH);

        let mut message = Message::new();
        message
            .set_id(1)
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Query)
            .set_authoritative(true)
            .set_response_code(ResponseCode::NoError);
        message.add_query(query);
        message.add_answer(Record::from_rdata(name, 0, RData::TXT(TXT::new(vec!["9.18.1".into()]))));
        message
    }

    #[test]
    fn test_header_attributes() {
        let signature = extract_signature(&version_response());
        assert_eq!(signature.get("rcode"), Some(&SignatureValue::Int(0)));
        assert_eq!(signature.get("aa"), Some(&SignatureValue::Bool(true)));
        assert_eq!(signature.get("ra"), Some(&SignatureValue::Bool(false)));
        assert_eq!(signature.get("answer_types"), Some(&SignatureValue::Text("TXT".into())));
        assert_eq!(signature.get("edns"), Some(&SignatureValue::Bool(false)));
        assert!(signature.get("nsid").is_none());
    }

    #[test]
    fn test_edns_attributes() {
        let mut message = version_response();
        let mut edns = Edns::new();
        edns.set_max_payload(4096).set_version(0);
        edns.options_mut()
            .insert(EdnsOption::Unknown(u16::from(EdnsCode::NSID), b"ns1".to_vec()));
        message.set_edns(edns);

        let signature = extract_signature(&message);
        assert_eq!(signature.get("edns"), Some(&SignatureValue::Bool(true)));
        assert_eq!(signature.get("edns_udp"), Some(&SignatureValue::Int(4096)));
        assert_eq!(signature.get("nsid"), Some(&SignatureValue::Bool(true)));
        assert_eq!(signature.get("cookie"), Some(&SignatureValue::Bool(false)));
        assert_eq!(signature.get("edns_do"), Some(&SignatureValue::Bool(false)));
    }
}
