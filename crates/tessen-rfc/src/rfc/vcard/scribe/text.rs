//! Scribes for single text, URI and text-list properties.

use super::{ParseContext, ScribeError, ScribeResult, TypeValue, VCardPropertyScribe, WriteContext};
use crate::rfc::vcard::core::{
    VCardDataType, VCardKind, VCardParameters, VCardValue, VCardVersion, names, types,
};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::{escape_text, join_list, split_list, unescape_text};
use crate::rfc::vcard::xml::XCardElement;

use VCardVersion::{V2_1, V3_0, V4_0};

const EMAIL_TYPES: &[TypeValue] = &[
    TypeValue::new(types::INTERNET, VCardVersion::ALL),
    TypeValue::new(types::X400, VCardVersion::LEGACY),
    TypeValue::new(types::HOME, VCardVersion::ALL),
    TypeValue::new(types::WORK, VCardVersion::ALL),
    TypeValue::new(types::PREF, VCardVersion::LEGACY),
    TypeValue::new("aol", &[V2_1]),
    TypeValue::new("applelink", &[V2_1]),
    TypeValue::new("attmail", &[V2_1]),
    TypeValue::new("cis", &[V2_1]),
    TypeValue::new("eworld", &[V2_1]),
    TypeValue::new("ibmmail", &[V2_1]),
    TypeValue::new("mcimail", &[V2_1]),
    TypeValue::new("powershare", &[V2_1]),
    TypeValue::new("prodigy", &[V2_1]),
    TypeValue::new("tlx", &[V2_1]),
];

const IMPP_TYPES: &[TypeValue] = &[
    TypeValue::new(types::PERSONAL, &[V3_0]),
    TypeValue::new(types::BUSINESS, &[V3_0]),
    TypeValue::new(types::HOME, VCardVersion::MODERN),
    TypeValue::new(types::WORK, VCardVersion::MODERN),
    TypeValue::new(types::MOBILE, &[V3_0]),
    TypeValue::new(types::PREF, &[V3_0]),
];

const WORK_HOME_TYPES: &[TypeValue] = &[
    TypeValue::new(types::HOME, &[V4_0]),
    TypeValue::new(types::WORK, &[V4_0]),
];

const LEVELS: &[&str] = &["beginner", "average", "expert", "low", "medium", "high"];

/// A single free-text value (FN, NOTE, TITLE, EMAIL, ...).
#[derive(Debug, Clone)]
pub struct TextScribe {
    name: &'static str,
    versions: &'static [VCardVersion],
    types: &'static [TypeValue],
    /// URI scheme whose hCard `href` carries the value, e.g. `mailto:`.
    html_scheme: Option<&'static str>,
}

impl TextScribe {
    #[must_use]
    pub const fn new(name: &'static str, versions: &'static [VCardVersion]) -> Self {
        Self {
            name,
            versions,
            types: &[],
            html_scheme: None,
        }
    }

    #[must_use]
    pub const fn with_types(mut self, types: &'static [TypeValue]) -> Self {
        self.types = types;
        self
    }

    #[must_use]
    pub const fn with_html_scheme(mut self, scheme: &'static str) -> Self {
        self.html_scheme = Some(scheme);
        self
    }

    #[must_use]
    pub const fn formatted_name() -> Self {
        Self::new(names::FN, VCardVersion::ALL)
    }

    #[must_use]
    pub const fn email() -> Self {
        Self::new(names::EMAIL, VCardVersion::ALL)
            .with_types(EMAIL_TYPES)
            .with_html_scheme("mailto:")
    }

    #[must_use]
    pub const fn expertise() -> Self {
        Self::new(names::EXPERTISE, VCardVersion::V4_ONLY)
    }

    #[must_use]
    pub const fn hobby() -> Self {
        Self::new(names::HOBBY, VCardVersion::V4_ONLY)
    }

    #[must_use]
    pub const fn interest() -> Self {
        Self::new(names::INTEREST, VCardVersion::V4_ONLY)
    }

    /// Every built-in free-text property.
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::formatted_name(),
            Self::new(names::NOTE, VCardVersion::ALL),
            Self::new(names::TITLE, VCardVersion::ALL),
            Self::new(names::ROLE, VCardVersion::ALL),
            Self::new(names::PRODID, VCardVersion::MODERN),
            Self::new(names::MAILER, VCardVersion::LEGACY),
            Self::new(names::LABEL, VCardVersion::LEGACY),
            Self::new(names::SORT_STRING, &[V3_0]),
            Self::new(names::CLASS, &[V3_0]),
            Self::new(names::NAME, &[V3_0]),
            Self::new(names::XML, VCardVersion::V4_ONLY),
            Self::email(),
            Self::expertise(),
            Self::hobby(),
            Self::interest(),
        ]
    }

    fn is_leveled(&self) -> bool {
        matches!(self.name, names::EXPERTISE | names::HOBBY | names::INTEREST)
    }
}

impl VCardPropertyScribe for TextScribe {
    fn property_name(&self) -> &str {
        self.name
    }

    fn supported_versions(&self) -> &[VCardVersion] {
        self.versions
    }

    fn type_values(&self) -> &[TypeValue] {
        self.types
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        match value.as_text() {
            Some(text) => Ok(escape_text(text)),
            None => Err(ScribeError::mismatch(self.name, value)),
        }
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::Text(unescape_text(raw)))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        if let Some(scheme) = self.html_scheme
            && let Some(href) = element.attr("href")
            && let Some(target) = strip_scheme(href, scheme)
        {
            // mailto:a@b.com?subject=x
            let target = target.split('?').next().unwrap_or(target);
            for type_value in element.types() {
                ctx.params.add_type(type_value);
            }
            return Ok(VCardValue::Text(target.to_string()));
        }
        for type_value in element.types() {
            ctx.params.add_type(type_value);
        }
        Ok(VCardValue::Text(element.value()))
    }

    fn validate(
        &self,
        value: &VCardValue,
        params: &VCardParameters,
        _version: VCardVersion,
    ) -> Vec<String> {
        let mut warnings = Vec::new();
        if value.as_text().is_some_and(str::is_empty) {
            warnings.push(format!("{} has an empty value", self.name));
        }
        if self.is_leveled()
            && let Some(level) = params.level()
            && !LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            warnings.push(format!("{} has an unrecognized LEVEL \"{level}\"", self.name));
        }
        warnings
    }
}

/// A single URI value (URL, SOURCE, IMPP, MEMBER, ...).
#[derive(Debug, Clone)]
pub struct UriScribe {
    name: &'static str,
    versions: &'static [VCardVersion],
    types: &'static [TypeValue],
}

impl UriScribe {
    #[must_use]
    pub const fn new(name: &'static str, versions: &'static [VCardVersion]) -> Self {
        Self {
            name,
            versions,
            types: &[],
        }
    }

    #[must_use]
    pub const fn with_types(mut self, types: &'static [TypeValue]) -> Self {
        self.types = types;
        self
    }

    #[must_use]
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::new(names::URL, VCardVersion::ALL).with_types(WORK_HOME_TYPES),
            Self::new(names::SOURCE, VCardVersion::MODERN),
            Self::new(names::FBURL, VCardVersion::V4_ONLY).with_types(WORK_HOME_TYPES),
            Self::new(names::CALURI, VCardVersion::V4_ONLY).with_types(WORK_HOME_TYPES),
            Self::new(names::CALADRURI, VCardVersion::V4_ONLY).with_types(WORK_HOME_TYPES),
            Self::new(names::MEMBER, VCardVersion::V4_ONLY),
            Self::new(names::IMPP, VCardVersion::MODERN).with_types(IMPP_TYPES),
            Self::new(names::ORG_DIRECTORY, VCardVersion::V4_ONLY).with_types(WORK_HOME_TYPES),
        ]
    }

    fn uri_of<'a>(&self, value: &'a VCardValue) -> ScribeResult<&'a str> {
        match value {
            VCardValue::Uri(uri) | VCardValue::Text(uri) => Ok(uri),
            other => Err(ScribeError::mismatch(self.name, other)),
        }
    }
}

impl VCardPropertyScribe for UriScribe {
    fn property_name(&self) -> &str {
        self.name
    }

    fn supported_versions(&self) -> &[VCardVersion] {
        self.versions
    }

    fn type_values(&self) -> &[TypeValue] {
        self.types
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType> {
        // 2.1 URL has no VALUE token of its own.
        if version == V2_1 && self.name != names::URL {
            return Some(VCardDataType::Text);
        }
        Some(VCardDataType::Uri)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        self.uri_of(value).map(ToString::to_string)
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::Uri(raw.trim().to_string()))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        element.append(VCardDataType::Uri.name(), self.uri_of(value)?);
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        element
            .first(VCardDataType::Uri.name())
            .or_else(|| element.first(VCardDataType::Text.name()))
            .map(|uri| self.parse_text(&uri, None, ctx))
            .unwrap_or_else(|| Err(ScribeError::missing_xml_elements(&["uri"])))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        for type_value in element.types() {
            ctx.params.add_type(type_value);
        }
        let uri = element.link_value().unwrap_or_else(|| element.value());
        self.parse_text(&uri, None, ctx)
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        self.uri_of(value).map(JCardValue::single)
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        self.parse_text(&value.as_single(), data_type, ctx)
    }
}

/// UID: text below 4.0, URI at 4.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct UidScribe;

impl VCardPropertyScribe for UidScribe {
    fn property_name(&self) -> &str {
        names::UID
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType> {
        match version {
            V4_0 => Some(VCardDataType::Uri),
            V2_1 | V3_0 => Some(VCardDataType::Text),
        }
    }

    fn write_text(&self, value: &VCardValue, ctx: &mut WriteContext) -> ScribeResult<String> {
        match value {
            VCardValue::Uri(uid) if ctx.version == V4_0 => Ok(uid.clone()),
            VCardValue::Uri(uid) | VCardValue::Text(uid) => Ok(escape_text(uid)),
            other => Err(ScribeError::mismatch(names::UID, other)),
        }
    }

    fn parse_text(
        &self,
        raw: &str,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let is_uri = match data_type {
            Some(dt) => *dt == VCardDataType::Uri,
            None => ctx.version == V4_0,
        };
        if is_uri {
            Ok(VCardValue::Uri(raw.trim().to_string()))
        } else {
            Ok(VCardValue::Text(unescape_text(raw)))
        }
    }
}

/// NICKNAME and CATEGORIES: comma-separated text lists.
#[derive(Debug, Clone)]
pub struct TextListScribe {
    name: &'static str,
    versions: &'static [VCardVersion],
    types: &'static [TypeValue],
}

impl TextListScribe {
    #[must_use]
    pub const fn nickname() -> Self {
        Self {
            name: names::NICKNAME,
            versions: VCardVersion::MODERN,
            types: WORK_HOME_TYPES,
        }
    }

    #[must_use]
    pub const fn categories() -> Self {
        Self {
            name: names::CATEGORIES,
            versions: VCardVersion::MODERN,
            types: &[],
        }
    }

    fn items<'a>(&self, value: &'a VCardValue) -> ScribeResult<Vec<&'a str>> {
        match value {
            VCardValue::TextList(items) => Ok(items.iter().map(String::as_str).collect()),
            VCardValue::Text(item) => Ok(vec![item.as_str()]),
            other => Err(ScribeError::mismatch(self.name, other)),
        }
    }
}

impl VCardPropertyScribe for TextListScribe {
    fn property_name(&self) -> &str {
        self.name
    }

    fn supported_versions(&self) -> &[VCardVersion] {
        self.versions
    }

    fn type_values(&self) -> &[TypeValue] {
        self.types
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        self.items(value).map(|items| join_list(&items))
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::TextList(split_list(raw)))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        for item in self.items(value)? {
            element.append(VCardDataType::Text.name(), item);
        }
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        let items = element.all(VCardDataType::Text.name());
        if items.is_empty() {
            return Err(ScribeError::missing_xml_elements(&["text"]));
        }
        Ok(VCardValue::TextList(items))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::TextList(vec![element.value()]))
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        let items = self.items(value)?;
        Ok(match items.as_slice() {
            [single] => JCardValue::single(*single),
            _ => JCardValue::multi(items),
        })
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::TextList(value.as_multi()))
    }
}

/// LANG (4.0): a BCP 47 language tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageScribe;

impl VCardPropertyScribe for LanguageScribe {
    fn property_name(&self) -> &str {
        names::LANG
    }

    fn supported_versions(&self) -> &[VCardVersion] {
        VCardVersion::V4_ONLY
    }

    fn type_values(&self) -> &[TypeValue] {
        WORK_HOME_TYPES
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::LanguageTag)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        match value.as_text() {
            Some(tag) => Ok(escape_text(tag)),
            None => Err(ScribeError::mismatch(names::LANG, value)),
        }
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::LanguageTag(unescape_text(raw).trim().to_string()))
    }
}

/// KIND (4.0).
#[derive(Debug, Clone, Copy, Default)]
pub struct KindScribe;

impl VCardPropertyScribe for KindScribe {
    fn property_name(&self) -> &str {
        names::KIND
    }

    fn supported_versions(&self) -> &[VCardVersion] {
        VCardVersion::V4_ONLY
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        match value {
            VCardValue::Kind(kind) => Ok(escape_text(kind.as_str())),
            VCardValue::Text(text) => Ok(escape_text(text)),
            other => Err(ScribeError::mismatch(names::KIND, other)),
        }
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::Kind(VCardKind::from_str(&unescape_text(raw))))
    }
}

fn strip_scheme<'a>(uri: &'a str, scheme: &str) -> Option<&'a str> {
    let head = uri.get(..scheme.len())?;
    head.eq_ignore_ascii_case(scheme)
        .then(|| &uri[scheme.len()..])
}
