//! Scribes for semicolon-structured values: N, ADR, ORG, GENDER, CLIENTPIDMAP.

use super::{ParseContext, ScribeError, ScribeResult, TypeValue, VCardPropertyScribe, WriteContext};
use crate::rfc::vcard::core::{
    Address, ClientPidMap, Gender, Organization, Sex, StructuredName, VCardDataType,
    VCardParameters, VCardValue, VCardVersion, names, types,
};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::{
    escape_text, join_structured, split_list, split_structured, unescape_text,
};
use crate::rfc::vcard::xml::XCardElement;

use VCardVersion::V4_0;

const N_ELEMENTS: [&str; StructuredName::ARITY] =
    ["surname", "given", "additional", "prefix", "suffix"];
const N_CLASSES: [&str; StructuredName::ARITY] = [
    "family-name",
    "given-name",
    "additional-name",
    "honorific-prefix",
    "honorific-suffix",
];

const ADR_ELEMENTS: [&str; Address::ARITY] = [
    "pobox", "ext", "street", "locality", "region", "code", "country",
];
const ADR_CLASSES: [&str; Address::ARITY] = [
    "post-office-box",
    "extended-address",
    "street-address",
    "locality",
    "region",
    "postal-code",
    "country-name",
];

const ADR_TYPES: &[TypeValue] = &[
    TypeValue::new(types::HOME, VCardVersion::ALL),
    TypeValue::new(types::WORK, VCardVersion::ALL),
    TypeValue::new(types::DOM, VCardVersion::LEGACY),
    TypeValue::new(types::INTL, VCardVersion::LEGACY),
    TypeValue::new(types::POSTAL, VCardVersion::LEGACY),
    TypeValue::new(types::PARCEL, VCardVersion::LEGACY),
    TypeValue::new(types::PREF, VCardVersion::LEGACY),
];

const ORG_TYPES: &[TypeValue] = &[
    TypeValue::new(types::HOME, VCardVersion::V4_ONLY),
    TypeValue::new(types::WORK, VCardVersion::V4_ONLY),
];

/// Splits text into components, each a comma list.
fn text_components(raw: &str) -> Vec<Vec<String>> {
    split_structured(raw).into_iter().map(split_list).collect()
}

/// Keeps the first `arity` components. Non-empty components past the end are
/// dropped with a warning.
fn fit_components(
    mut components: Vec<Vec<String>>,
    arity: usize,
    ctx: &mut ParseContext,
) -> Vec<Vec<String>> {
    if components.len() > arity {
        let extra = components.split_off(arity);
        let lost = extra.iter().filter(|c| !c.is_empty()).count();
        if lost > 0 {
            ctx.warn(format!(
                "expected {arity} components, found {}; {lost} extra ignored",
                arity + extra.len()
            ));
        }
    }
    components
}

fn xml_components(element: &XCardElement, names: &[&str]) -> Option<Vec<Vec<String>>> {
    let components: Vec<Vec<String>> = names
        .iter()
        .map(|name| {
            element
                .all(name)
                .into_iter()
                .filter(|v| !v.is_empty())
                .collect()
        })
        .collect();
    names
        .iter()
        .any(|name| element.has_child(name))
        .then_some(components)
}

fn write_xml_components(element: &mut XCardElement, names: &[&str], components: &[&[String]]) {
    for (name, values) in names.iter().zip(components) {
        if values.is_empty() {
            element.append(name, "");
        }
        for value in *values {
            element.append(name, value.as_str());
        }
    }
}

fn html_components(element: &HCardElement<'_>, classes: &[&str]) -> Vec<Vec<String>> {
    classes
        .iter()
        .map(|class| element.all_values(class))
        .collect()
}

/// N: family;given;additional;prefixes;suffixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredNameScribe;

impl StructuredNameScribe {
    fn name_of(value: &VCardValue) -> ScribeResult<&StructuredName> {
        value
            .as_structured_name()
            .ok_or_else(|| ScribeError::mismatch(names::N, value))
    }
}

impl VCardPropertyScribe for StructuredNameScribe {
    fn property_name(&self) -> &str {
        names::N
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        Ok(join_structured(&Self::name_of(value)?.components()))
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let components = fit_components(text_components(raw), StructuredName::ARITY, ctx);
        Ok(StructuredName::from_components(components).into())
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        write_xml_components(element, &N_ELEMENTS, &Self::name_of(value)?.components());
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        xml_components(element, &N_ELEMENTS)
            .map(|c| StructuredName::from_components(c).into())
            .ok_or_else(|| ScribeError::missing_xml_elements(&N_ELEMENTS))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(StructuredName::from_components(html_components(element, &N_CLASSES)).into())
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        Ok(JCardValue::structured(&Self::name_of(value)?.components()))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let components = fit_components(value.as_structured(), StructuredName::ARITY, ctx);
        Ok(StructuredName::from_components(components).into())
    }
}

/// ADR: the seven address components. LABEL is a 4.0 parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressScribe;

impl AddressScribe {
    fn address_of(value: &VCardValue) -> ScribeResult<&Address> {
        value
            .as_address()
            .ok_or_else(|| ScribeError::mismatch(names::ADR, value))
    }
}

impl VCardPropertyScribe for AddressScribe {
    fn property_name(&self) -> &str {
        names::ADR
    }

    fn type_values(&self) -> &[TypeValue] {
        ADR_TYPES
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn prepare_parameters(
        &self,
        _value: &VCardValue,
        params: &mut VCardParameters,
        version: VCardVersion,
    ) {
        if version != V4_0 {
            params.remove("LABEL");
        }
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        Ok(join_structured(&Self::address_of(value)?.components()))
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let components = fit_components(text_components(raw), Address::ARITY, ctx);
        Ok(Address::from_components(components).into())
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        write_xml_components(element, &ADR_ELEMENTS, &Self::address_of(value)?.components());
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        xml_components(element, &ADR_ELEMENTS)
            .map(|c| Address::from_components(c).into())
            .ok_or_else(|| ScribeError::missing_xml_elements(&ADR_ELEMENTS))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        for type_value in element.types() {
            ctx.params.add_type(type_value);
        }
        Ok(Address::from_components(html_components(element, &ADR_CLASSES)).into())
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        Ok(JCardValue::structured(&Self::address_of(value)?.components()))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let components = fit_components(value.as_structured(), Address::ARITY, ctx);
        Ok(Address::from_components(components).into())
    }

    fn validate(
        &self,
        value: &VCardValue,
        params: &VCardParameters,
        version: VCardVersion,
    ) -> Vec<String> {
        let mut warnings = Vec::new();
        if value.as_address().is_some_and(Address::is_empty) {
            warnings.push("ADR has no address components".to_string());
        }
        if version != V4_0 && params.label().is_some() {
            warnings.push(format!(
                "LABEL parameter is not supported by version {}; use the LABEL property",
                version.as_str()
            ));
        }
        warnings
    }
}

/// ORG: organization name followed by units.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationScribe;

impl OrganizationScribe {
    fn org_of(value: &VCardValue) -> ScribeResult<&Organization> {
        match value {
            VCardValue::Organization(org) => Ok(org),
            other => Err(ScribeError::mismatch(names::ORG, other)),
        }
    }
}

impl VCardPropertyScribe for OrganizationScribe {
    fn property_name(&self) -> &str {
        names::ORG
    }

    fn type_values(&self) -> &[TypeValue] {
        ORG_TYPES
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        Ok(Self::org_of(value)?
            .values()
            .into_iter()
            .map(escape_text)
            .collect::<Vec<_>>()
            .join(";"))
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let values = split_structured(raw).into_iter().map(unescape_text).collect();
        Ok(VCardValue::Organization(Organization::from_values(values)))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        for part in Self::org_of(value)?.values() {
            element.append(VCardDataType::Text.name(), part);
        }
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        let values = element.all(VCardDataType::Text.name());
        if values.is_empty() {
            return Err(ScribeError::missing_xml_elements(&["text"]));
        }
        Ok(VCardValue::Organization(Organization::from_values(values)))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let name = element
            .first_value("organization-name")
            .unwrap_or_else(|| element.value());
        let units = element.all_values("organization-unit");
        Ok(VCardValue::Organization(Organization::with_units(name, units)))
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        let values = Self::org_of(value)?.values();
        Ok(match values.as_slice() {
            [name] => JCardValue::single(*name),
            _ => JCardValue::Structured(
                values
                    .into_iter()
                    .map(|v| vec![serde_json::Value::from(v)])
                    .collect(),
            ),
        })
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let values = value
            .as_structured()
            .into_iter()
            .map(|component| component.join(","))
            .collect();
        Ok(VCardValue::Organization(Organization::from_values(values)))
    }
}

/// GENDER (4.0): `sex[;identity]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenderScribe;

impl GenderScribe {
    fn gender_of(value: &VCardValue) -> ScribeResult<&Gender> {
        match value {
            VCardValue::Gender(gender) => Ok(gender),
            other => Err(ScribeError::mismatch(names::GENDER, other)),
        }
    }

    fn from_parts(sex: &str, identity: Option<String>, ctx: &mut ParseContext) -> Gender {
        let sex_char = sex.trim().chars().next();
        let parsed = sex_char.and_then(Sex::from_char);
        if sex_char.is_some() && parsed.is_none() {
            ctx.warn(format!("unrecognized sex \"{}\"", sex.trim()));
        }
        Gender {
            sex: parsed,
            identity: identity.filter(|i| !i.is_empty()),
        }
    }
}

impl VCardPropertyScribe for GenderScribe {
    fn property_name(&self) -> &str {
        names::GENDER
    }

    fn supported_versions(&self) -> &[VCardVersion] {
        VCardVersion::V4_ONLY
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        let gender = Self::gender_of(value)?;
        let mut text = gender.sex.map(|s| s.as_char().to_string()).unwrap_or_default();
        if let Some(identity) = &gender.identity {
            text.push(';');
            text.push_str(&escape_text(identity));
        }
        Ok(text)
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let parts = split_structured(raw);
        let sex = parts.first().copied().unwrap_or_default();
        let identity = parts.get(1).map(|i| unescape_text(i));
        Ok(VCardValue::Gender(Self::from_parts(sex, identity, ctx)))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        let gender = Self::gender_of(value)?;
        element.append(
            "sex",
            gender.sex.map(|s| s.as_char().to_string()).unwrap_or_default(),
        );
        if let Some(identity) = &gender.identity {
            element.append("identity", identity.as_str());
        }
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        let Some(sex) = element.first("sex") else {
            return Err(ScribeError::missing_xml_elements(&["sex"]));
        };
        let identity = element.first("identity");
        Ok(VCardValue::Gender(Self::from_parts(&sex, identity, ctx)))
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        let gender = Self::gender_of(value)?;
        let sex = gender.sex.map(|s| s.as_char().to_string()).unwrap_or_default();
        Ok(match &gender.identity {
            Some(identity) => JCardValue::Structured(vec![
                vec![serde_json::Value::from(sex)],
                vec![serde_json::Value::from(identity.as_str())],
            ]),
            None => JCardValue::single(sex),
        })
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let mut components = value.as_structured().into_iter().map(|c| c.join(","));
        let sex = components.next().unwrap_or_default();
        let identity = components.next();
        Ok(VCardValue::Gender(Self::from_parts(&sex, identity, ctx)))
    }
}

/// CLIENTPIDMAP (4.0): `source-id;uri`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientPidMapScribe;

impl ClientPidMapScribe {
    fn map_of(value: &VCardValue) -> ScribeResult<&ClientPidMap> {
        match value {
            VCardValue::ClientPidMap(map) => Ok(map),
            other => Err(ScribeError::mismatch(names::CLIENTPIDMAP, other)),
        }
    }

    fn build(source_id: &str, uri: Option<String>) -> ScribeResult<VCardValue> {
        let source_id = source_id.trim().parse::<u32>().map_err(|_| {
            ScribeError::unparseable(format!("source ID \"{}\" is not an integer", source_id.trim()))
        })?;
        let uri = uri
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ScribeError::unparseable("CLIENTPIDMAP is missing its URI"))?;
        Ok(VCardValue::ClientPidMap(ClientPidMap::new(
            source_id,
            uri.trim(),
        )))
    }
}

impl VCardPropertyScribe for ClientPidMapScribe {
    fn property_name(&self) -> &str {
        names::CLIENTPIDMAP
    }

    fn supported_versions(&self) -> &[VCardVersion] {
        VCardVersion::V4_ONLY
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        let map = Self::map_of(value)?;
        Ok(format!("{};{}", map.source_id, escape_text(&map.uri)))
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let parts = split_structured(raw);
        let source_id = parts.first().copied().unwrap_or_default();
        Self::build(source_id, parts.get(1).map(|u| unescape_text(u)))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        let map = Self::map_of(value)?;
        element.append("sourceid", map.source_id.to_string());
        element.append(VCardDataType::Uri.name(), map.uri.as_str());
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        let Some(source_id) = element.first("sourceid") else {
            return Err(ScribeError::missing_xml_elements(&["sourceid", "uri"]));
        };
        Self::build(&source_id, element.first(VCardDataType::Uri.name()))
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        let map = Self::map_of(value)?;
        Ok(JCardValue::Structured(vec![
            vec![serde_json::Value::from(map.source_id)],
            vec![serde_json::Value::from(map.uri.as_str())],
        ]))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let mut components = value.as_structured().into_iter().map(|c| c.join(","));
        let source_id = components.next().unwrap_or_default();
        Self::build(&source_id, components.next())
    }
}
