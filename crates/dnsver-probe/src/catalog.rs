//! Probe catalog: cartesian product of query option dimensions.

use std::collections::HashSet;

use dnsver_core::{
    Dimension, DnsverError, Opcode, OptionValue, ProbeDefinition, QueryClass, QueryOption, Result,
};

/// Query name used when a probe does not target a special name
pub const DEFAULT_QNAME: &str = "dnssoftver.com.";

/// The built-in option dimensions, in enumeration order.
#[must_use]
pub fn default_dimensions() -> Vec<Dimension> {
    let chaos_txt = |label: &str| {
        OptionValue::new(
            label,
            QueryOption::Target {
                qname: format!("{label}."),
                qclass: QueryClass::Ch,
                qtype: "TXT".into(),
            },
        )
    };

    vec![
        Dimension::new(
            "target",
            vec![
                OptionValue::unlabelled(QueryOption::Target {
                    qname: DEFAULT_QNAME.into(),
                    qclass: QueryClass::In,
                    qtype: "A".into(),
                }),
                chaos_txt("version.bind"),
                chaos_txt("hostname.bind"),
                chaos_txt("id.server"),
                OptionValue::new(
                    "root",
                    QueryOption::Target {
                        qname: ".".into(),
                        qclass: QueryClass::In,
                        qtype: "NS".into(),
                    },
                ),
            ],
        ),
        Dimension::new(
            "opcode",
            vec![
                OptionValue::absent(),
                OptionValue::new("status", QueryOption::Opcode(Opcode::Status)),
                OptionValue::new("notify", QueryOption::Opcode(Opcode::Notify)),
            ],
        ),
        Dimension::toggle("rd", QueryOption::RecursionDesired),
        Dimension::toggle("cd", QueryOption::CheckingDisabled),
        Dimension::toggle("ad", QueryOption::AuthenticData),
        Dimension::new(
            "edns",
            vec![
                OptionValue::absent(),
                OptionValue::new("edns0", QueryOption::Edns(0)),
                OptionValue::new("edns1", QueryOption::Edns(1)),
            ],
        ),
        Dimension::toggle("do", QueryOption::DnssecOk),
        Dimension::toggle("nsid", QueryOption::Nsid),
        Dimension::toggle("cookie", QueryOption::Cookie),
    ]
}

/// Parse a probe-name list: one name per line, `#` comments and blank
/// lines ignored, duplicates collapsed.
pub fn parse_probe_names(content: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let names: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(DnsverError::ProbeList("no probe names".into()));
    }
    Ok(names)
}

/// Ordered, deduplicated set of probes to send to every target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeCatalog {
    probes: Vec<ProbeDefinition>,
}

impl ProbeCatalog {
    /// Every combination of the dimensions, in odometer order with the last
    /// dimension varying fastest. Later duplicates of a name are dropped.
    #[must_use]
    pub fn full(dimensions: &[Dimension]) -> Self {
        let mut probes = Vec::new();
        let mut names = HashSet::new();

        if dimensions.iter().any(|d| d.values.is_empty()) {
            return Self { probes };
        }

        let mut indices = vec![0_usize; dimensions.len()];
        loop {
            let probe = ProbeDefinition::from_values(
                dimensions.iter().zip(&indices).map(|(d, &i)| &d.values[i]),
            );
            if names.insert(probe.name().to_string()) {
                probes.push(probe);
            }

            // Advance the odometer; done once every position wrapped.
            let mut position = dimensions.len();
            loop {
                if position == 0 {
                    return Self { probes };
                }
                position -= 1;
                indices[position] += 1;
                if indices[position] < dimensions[position].values.len() {
                    break;
                }
                indices[position] = 0;
            }
        }
    }

    /// The combinations whose name appears in `needed`, in enumeration order.
    #[must_use]
    pub fn select(dimensions: &[Dimension], needed: &[String]) -> Self {
        let wanted: HashSet<&str> = needed.iter().map(String::as_str).collect();
        let mut catalog = Self::full(dimensions);
        catalog.probes.retain(|p| wanted.contains(p.name()));

        let missing = catalog.missing(needed);
        if !missing.is_empty() {
            tracing::warn!(
                count = missing.len(),
                first = %missing[0],
                "needed probes not producible from option dimensions"
            );
        }
        catalog
    }

    /// Names in `needed` that this catalog does not contain
    #[must_use]
    pub fn missing<'a>(&self, needed: &'a [String]) -> Vec<&'a str> {
        let have: HashSet<&str> = self.probes.iter().map(ProbeDefinition::name).collect();
        needed
            .iter()
            .map(String::as_str)
            .filter(|name| !have.contains(name))
            .collect()
    }

    /// Probes in order
    #[must_use]
    pub fn probes(&self) -> &[ProbeDefinition] {
        &self.probes
    }

    /// Look up a probe by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProbeDefinition> {
        self.probes.iter().find(|p| p.name() == name)
    }

    /// Number of probes
    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// True when no probe was selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl From<Vec<ProbeDefinition>> for ProbeCatalog {
    fn from(probes: Vec<ProbeDefinition>) -> Self {
        Self { probes }
    }
}
