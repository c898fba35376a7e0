//! vCard parameters and the ordered parameter set attached to each property.

use std::fmt;

use super::data_type::VCardDataType;

/// A vCard parameter.
///
/// Parameters can have multiple values (e.g., TYPE=home,work).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VCardParameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter values.
    pub values: Vec<String>,
}

impl VCardParameter {
    /// Creates a new parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    /// Creates a parameter with multiple values.
    #[must_use]
    pub fn multi(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Returns the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns whether the parameter has the specified value (case-insensitive).
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    /// Returns whether this parameter is called `name` (case-insensitive).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A PID parameter value (`local-id[.clientpidmap-id]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pid {
    pub local_id: u32,
    pub client_pid_map: Option<u32>,
}

impl Pid {
    /// Parses `1` or `1.2`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (local, map) = match s.trim().split_once('.') {
            Some((local, map)) => (local, Some(map)),
            None => (s.trim(), None),
        };
        let local_id = local.parse().ok()?;
        let client_pid_map = match map {
            Some(m) => Some(m.parse().ok()?),
            None => None,
        };
        Some(Self {
            local_id,
            client_pid_map,
        })
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.client_pid_map {
            Some(map) => write!(f, "{}.{map}", self.local_id),
            None => write!(f, "{}", self.local_id),
        }
    }
}

/// Ordered parameter multimap of a single property.
///
/// Names compare case-insensitively and are stored uppercase. Insertion order
/// is preserved so output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VCardParameters {
    params: Vec<VCardParameter>,
}

impl VCardParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterates over parameters in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, VCardParameter> {
        self.params.iter()
    }

    /// Returns whether any parameter called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.is(name))
    }

    /// Returns the first value of `name`.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .filter(|p| p.is(name))
            .find_map(VCardParameter::value)
    }

    /// Returns every value of `name`, across repeated parameters.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |p| p.is(name))
            .flat_map(|p| p.values.iter().map(String::as_str))
    }

    /// Appends a raw parameter.
    pub fn push(&mut self, param: VCardParameter) {
        self.params.push(param);
    }

    /// Adds a value to `name`, merging into the first existing parameter of
    /// that name.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        if let Some(existing) = self.params.iter_mut().find(|p| p.is(name)) {
            existing.values.push(value.into());
        } else {
            self.params.push(VCardParameter::new(name, value));
        }
    }

    /// Replaces every value of `name` with `value`, keeping the position of the
    /// first occurrence.
    pub fn put(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.params.iter().position(|p| p.is(name)) {
            Some(index) => {
                self.params[index].values = vec![value];
                let mut seen = 0usize;
                self.params.retain(|p| {
                    if p.is(name) {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.params.push(VCardParameter::new(name, value)),
        }
    }

    /// Removes every parameter called `name`, returning whether any existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.params.len();
        self.params.retain(|p| !p.is(name));
        before != self.params.len()
    }

    /// Removes one value of `name` (case-insensitive), dropping parameters
    /// left without values.
    pub fn remove_value(&mut self, name: &str, value: &str) -> bool {
        let mut removed = false;
        for param in self.params.iter_mut().filter(|p| p.is(name)) {
            let before = param.values.len();
            param.values.retain(|v| !v.eq_ignore_ascii_case(value));
            removed |= before != param.values.len();
        }
        self.params.retain(|p| !p.values.is_empty());
        removed
    }

    // --- TYPE ---

    /// Returns every TYPE value.
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        self.values("TYPE").collect()
    }

    /// Returns whether TYPE contains `value` (case-insensitive).
    #[must_use]
    pub fn has_type(&self, value: &str) -> bool {
        self.values("TYPE").any(|v| v.eq_ignore_ascii_case(value))
    }

    /// Adds a TYPE value unless already present.
    pub fn add_type(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !self.has_type(&value) {
            self.add("TYPE", value);
        }
    }

    pub fn remove_type(&mut self, value: &str) -> bool {
        self.remove_value("TYPE", value)
    }

    // --- PREF ---

    /// Returns the PREF value, if present and numeric.
    #[must_use]
    pub fn pref(&self) -> Option<u32> {
        self.first("PREF").and_then(|v| v.trim().parse().ok())
    }

    pub fn set_pref(&mut self, pref: Option<u32>) {
        match pref {
            Some(p) => self.put("PREF", p.to_string()),
            None => {
                self.remove("PREF");
            }
        }
    }

    // --- VALUE ---

    /// Returns the data type named by the VALUE parameter.
    #[must_use]
    pub fn value_type(&self) -> Option<VCardDataType> {
        self.first("VALUE").map(VCardDataType::from_name)
    }

    pub fn set_value_type(&mut self, data_type: Option<&VCardDataType>) {
        match data_type {
            Some(dt) => self.put("VALUE", dt.name()),
            None => {
                self.remove("VALUE");
            }
        }
    }

    // --- PID ---

    /// Returns every well-formed PID value.
    #[must_use]
    pub fn pids(&self) -> Vec<Pid> {
        self.values("PID").filter_map(Pid::parse).collect()
    }

    pub fn add_pid(&mut self, pid: Pid) {
        self.add("PID", pid.to_string());
    }

    // --- single-valued accessors ---

    #[must_use]
    pub fn alt_id(&self) -> Option<&str> {
        self.first("ALTID")
    }

    pub fn set_alt_id(&mut self, alt_id: impl Into<String>) {
        self.put("ALTID", alt_id);
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.first("LANGUAGE")
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.put("LANGUAGE", language);
    }

    /// Returns the LABEL parameter (formatted address text, 4.0).
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.first("LABEL")
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.put("LABEL", label);
    }

    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.first("MEDIATYPE")
    }

    pub fn set_media_type(&mut self, media_type: impl Into<String>) {
        self.put("MEDIATYPE", media_type);
    }

    /// Returns the LEVEL parameter (EXPERTISE, HOBBY, INTEREST).
    #[must_use]
    pub fn level(&self) -> Option<&str> {
        self.first("LEVEL")
    }

    pub fn set_level(&mut self, level: impl Into<String>) {
        self.put("LEVEL", level);
    }

    /// Returns the 2.1/3.0 ENCODING parameter.
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.first("ENCODING")
    }

    pub fn set_encoding(&mut self, encoding: impl Into<String>) {
        self.put("ENCODING", encoding);
    }

    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.first("CHARSET")
    }

    #[must_use]
    pub fn sort_as(&self) -> Vec<&str> {
        self.values("SORT-AS").collect()
    }

    #[must_use]
    pub fn calscale(&self) -> Option<&str> {
        self.first("CALSCALE")
    }

    #[must_use]
    pub fn geo(&self) -> Option<&str> {
        self.first("GEO")
    }

    #[must_use]
    pub fn tz(&self) -> Option<&str> {
        self.first("TZ")
    }
}

impl<'a> IntoIterator for &'a VCardParameters {
    type Item = &'a VCardParameter;
    type IntoIter = std::slice::Iter<'a, VCardParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl FromIterator<VCardParameter> for VCardParameters {
    fn from_iter<T: IntoIterator<Item = VCardParameter>>(iter: T) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

/// Common TYPE values as constants.
pub mod types {
    pub const PREF: &str = "pref";

    // Address types
    pub const HOME: &str = "home";
    pub const WORK: &str = "work";
    pub const DOM: &str = "dom";
    pub const INTL: &str = "intl";
    pub const POSTAL: &str = "postal";
    pub const PARCEL: &str = "parcel";

    // Telephone types
    pub const TEXT: &str = "text";
    pub const VOICE: &str = "voice";
    pub const FAX: &str = "fax";
    pub const CELL: &str = "cell";
    pub const VIDEO: &str = "video";
    pub const PAGER: &str = "pager";
    pub const TEXTPHONE: &str = "textphone";
    pub const MSG: &str = "msg";
    pub const BBS: &str = "bbs";
    pub const MODEM: &str = "modem";
    pub const CAR: &str = "car";
    pub const ISDN: &str = "isdn";
    pub const PCS: &str = "pcs";

    // Email types
    pub const INTERNET: &str = "internet";
    pub const X400: &str = "x400";

    // IMPP types
    pub const PERSONAL: &str = "personal";
    pub const BUSINESS: &str = "business";
    pub const MOBILE: &str = "mobile";

    // Related types
    pub const CONTACT: &str = "contact";
    pub const ACQUAINTANCE: &str = "acquaintance";
    pub const FRIEND: &str = "friend";
    pub const MET: &str = "met";
    pub const CO_WORKER: &str = "co-worker";
    pub const COLLEAGUE: &str = "colleague";
    pub const CO_RESIDENT: &str = "co-resident";
    pub const NEIGHBOR: &str = "neighbor";
    pub const CHILD: &str = "child";
    pub const PARENT: &str = "parent";
    pub const SIBLING: &str = "sibling";
    pub const SPOUSE: &str = "spouse";
    pub const KIN: &str = "kin";
    pub const MUSE: &str = "muse";
    pub const CRUSH: &str = "crush";
    pub const DATE: &str = "date";
    pub const SWEETHEART: &str = "sweetheart";
    pub const ME: &str = "me";
    pub const AGENT: &str = "agent";
    pub const EMERGENCY: &str = "emergency";
}
