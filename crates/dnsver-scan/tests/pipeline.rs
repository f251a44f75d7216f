//! End-to-end scans through the public API.

use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use dnsver_core::encoder::feature_name;
use dnsver_core::{
    Classifier, Dimension, FeatureVector, Granularity, Model, OptionValue, ProbeDefinition,
    QueryOption, Result, Signature, SignatureValue,
};
use dnsver_probe::{default_dimensions, ProbeCatalog, Prober, UdpTransport};
use dnsver_scan::{ArtifactPaths, Artifacts, ScanConfig, Scanner};

/// Responds to probe `A` with `{"value": 1}` and probe `B` with
/// `{"value": "x"}`, for one address only.
struct Fixture;

#[async_trait]
impl Prober for Fixture {
    async fn probe(&self, ip: IpAddr, probe: &ProbeDefinition) -> Signature {
        if ip.to_string() != "198.51.100.1" {
            return Signature::new();
        }
        match probe.name() {
            "A" => [("value", 1_i64)].into_iter().collect(),
            "B" => [("value", "x")].into_iter().collect(),
            _ => Signature::new(),
        }
    }
}

/// Records every vector it sees and labels `[1, 0, 1]` specially.
struct FakeModel {
    features: Vec<String>,
    seen: Mutex<Vec<Vec<bool>>>,
}

impl Model for FakeModel {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict(&self, features: &FeatureVector) -> Result<&str> {
        self.seen.lock().unwrap().push(features.as_slice().to_vec());
        Ok(if features.as_slice() == [true, false, true] {
            "bind-9.16|bind-9.18"
        } else {
            "unknown"
        })
    }
}

fn ab_catalog() -> ProbeCatalog {
    ProbeCatalog::full(&[Dimension::new(
        "fixture",
        vec![
            OptionValue::new("A", QueryOption::RecursionDesired),
            OptionValue::new("B", QueryOption::CheckingDisabled),
        ],
    )])
}

fn value(v: impl Into<SignatureValue>) -> Signature {
    let v: SignatureValue = v.into();
    [("value", v)].into_iter().collect()
}

// Features for A=1, A=0 and B=x. Real feature names are
// `<probe>_<canonical signature>` (see `feature_name`), so they are built
// here instead of spelled as `A_1`, `A_0`, `B_x`.
#[tokio::test]
async fn fixture_signature_classifies_as_expected() {
    let model = FakeModel {
        features: vec![
            feature_name("A", &value(1_i64).canonicalize()),
            feature_name("A", &value(0_i64).canonicalize()),
            feature_name("B", &value("x").canonicalize()),
        ],
        seen: Mutex::new(Vec::new()),
    };
    let classifier = Classifier::new(model).unwrap();
    let scanner = Scanner::new(Fixture, &ab_catalog(), &classifier, 100).unwrap();
    let mut output = Vec::new();

    let summary = scanner.run("198.51.100.1\n".as_bytes(), &mut output).await.unwrap();

    assert_eq!(summary.classified(), 1);
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "{\"ip\":\"198.51.100.1\",\"versions\":[\"bind-9.16\",\"bind-9.18\"]}\n"
    );
    assert_eq!(*classifier.model().seen.lock().unwrap(), vec![vec![true, false, true]]);
}

#[tokio::test]
async fn every_vector_has_model_width() {
    let model = FakeModel {
        features: vec!["A_1".into(), "A_0".into(), "B_x".into(), "C_()".into()],
        seen: Mutex::new(Vec::new()),
    };
    let classifier = Classifier::new(model).unwrap();
    let scanner = Scanner::new(Fixture, &ab_catalog(), &classifier, 3).unwrap();
    let mut output = Vec::new();

    scanner
        .run("198.51.100.1\n198.51.100.2\nnot-an-ip\n192.0.2.1\n".as_bytes(), &mut output)
        .await
        .unwrap();

    let seen = classifier.model().seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|v| v.len() == 4));
}

/// Answers CHAOS-class queries with NOERROR and ignores everything else.
async fn chaos_only_server(socket: tokio::net::UdpSocket) {
    use hickory_proto::op::{Message, MessageType, ResponseCode};
    use hickory_proto::rr::DNSClass;

    let mut buf = [0_u8; 1024];
    loop {
        let Ok((n, peer)) = socket.recv_from(&mut buf).await else {
            return;
        };
        let Ok(query) = Message::from_vec(&buf[..n]) else {
            continue;
        };
        if query.queries().first().map(|q| q.query_class()) != Some(DNSClass::CH) {
            continue;
        }
        let mut response = Message::new();
        response
            .set_id(query.id())
            .set_message_type(MessageType::Response)
            .set_op_code(query.op_code())
            .set_authoritative(true)
            .set_response_code(ResponseCode::NoError);
        response.add_queries(query.queries().to_vec());
        let _ = socket.send_to(&response.to_vec().unwrap(), peer).await;
    }
}

#[tokio::test]
async fn scan_with_artifacts_and_udp_executor() {
    let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    let server = tokio::spawn(chaos_only_server(socket));

    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("models")).unwrap();
    std::fs::create_dir_all(dir.path().join("queries")).unwrap();
    std::fs::write(dir.path().join("queries/queries_vendor.txt"), "rd\nversion.bind\n").unwrap();
    std::fs::write(
        dir.path().join("models/model_vendor.json"),
        r#"{
            "features": ["rd_(('error', 'timeout'),)"],
            "classes": ["unbound", "bind"],
            "nodes": [
                {"split": {"feature": 0, "threshold": 0.5, "left": 1, "right": 2}},
                {"leaf": {"class": 0}},
                {"leaf": {"class": 1}}
            ]
        }"#,
    )
    .unwrap();

    let artifacts = Artifacts::load(&ArtifactPaths::new(dir.path()), Granularity::Vendor, &default_dimensions()).unwrap();
    assert_eq!(artifacts.catalog.len(), 2);

    let config = ScanConfig::default().timeout(Duration::from_millis(200)).port(port);
    let executor = config.executor(UdpTransport::new());
    let scanner = Scanner::new(executor, &artifacts.catalog, &artifacts.classifier, config.workers).unwrap();
    let mut output = Vec::new();

    scanner.run("127.0.0.1\n".as_bytes(), &mut output).await.unwrap();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "{\"ip\":\"127.0.0.1\",\"versions\":[\"bind\"]}\n"
    );
    server.abort();
}
