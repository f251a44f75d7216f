use std::fmt;

/// DNS class a probe query is sent in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryClass {
    /// Internet
    In,
    /// Chaos
    Ch,
}

/// Header opcode a probe query is sent with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Opcode {
    /// Standard query
    #[default]
    Query,
    /// Server status request
    Status,
    /// Zone change notification
    Notify,
}

/// A single setting applied to a probe query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryOption {
    /// Question section: name, class and record type
    Target {
        /// Fully qualified query name
        qname: String,
        /// Query class
        qclass: QueryClass,
        /// Record type mnemonic (e.g. `TXT`)
        qtype: String,
    },
    /// Non-default header opcode
    Opcode(Opcode),
    /// RD header bit
    RecursionDesired,
    /// CD header bit
    CheckingDisabled,
    /// AD header bit
    AuthenticData,
    /// EDNS OPT record with the given version
    Edns(u8),
    /// DO bit in the EDNS flags
    DnssecOk,
    /// Empty NSID option
    Nsid,
    /// Client COOKIE option
    Cookie,
}

/// One possible value of a query option dimension.
///
/// An empty label marks the "option absent" value; it contributes nothing to
/// the probe name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValue {
    /// Label used to build probe names
    pub label: String,
    /// Setting applied to the query, if any
    pub option: Option<QueryOption>,
}

impl OptionValue {
    /// The absent value of a dimension
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            label: String::new(),
            option: None,
        }
    }

    /// A labelled value applying `option`
    #[must_use]
    pub fn new(label: impl Into<String>, option: QueryOption) -> Self {
        Self {
            label: label.into(),
            option: Some(option),
        }
    }

    /// A value applying `option` without contributing to the probe name
    #[must_use]
    pub const fn unlabelled(option: QueryOption) -> Self {
        Self {
            label: String::new(),
            option: Some(option),
        }
    }
}

/// An independent axis of query options, enumerated in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension name, for diagnostics only
    pub name: String,
    /// Ordered values, usually including [`OptionValue::absent`]
    pub values: Vec<OptionValue>,
}

impl Dimension {
    /// Create a dimension from its values
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<OptionValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// A two-valued dimension: absent, or `label` applying `option`
    #[must_use]
    pub fn toggle(label: &str, option: QueryOption) -> Self {
        Self::new(label, vec![OptionValue::absent(), OptionValue::new(label, option)])
    }
}

/// A named combination of query options sent to a target as one query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeDefinition {
    name: String,
    options: Vec<QueryOption>,
}

impl ProbeDefinition {
    /// Build a probe from one value per dimension.
    ///
    /// The name joins the non-empty labels with `_`.
    #[must_use]
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a OptionValue>) -> Self {
        let mut labels = Vec::new();
        let mut options = Vec::new();
        for value in values {
            if !value.label.is_empty() {
                labels.push(value.label.as_str());
            }
            if let Some(option) = &value.option {
                options.push(option.clone());
            }
        }
        Self {
            name: labels.join("_"),
            options,
        }
    }

    /// Probe name, also the column name in feature encoding
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Options applied to the query
    #[must_use]
    pub fn options(&self) -> &[QueryOption] {
        &self.options
    }

    /// Check whether the probe carries an option
    #[must_use]
    pub fn has(&self, option: &QueryOption) -> bool {
        self.options.contains(option)
    }
}

impl fmt::Display for ProbeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
