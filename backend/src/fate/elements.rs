//! The five phases and their relations.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// Element fed by this one (wood feeds fire, fire makes earth, ...).
    pub fn generates(self) -> Element {
        match self {
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
        }
    }

    /// Element kept in check by this one.
    pub fn controls(self) -> Element {
        match self {
            Element::Wood => Element::Earth,
            Element::Fire => Element::Metal,
            Element::Earth => Element::Water,
            Element::Metal => Element::Wood,
            Element::Water => Element::Fire,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Wood => "Wood",
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Metal => "Metal",
            Element::Water => "Water",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Yang,
    Yin,
}

/// How two elements stand to each other, read without direction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementRelation {
    Same,
    /// One feeds the other.
    Generating,
    /// One keeps the other in check.
    Controlling,
}

impl ElementRelation {
    pub fn between(a: Element, b: Element) -> Self {
        if a == b {
            ElementRelation::Same
        } else if a.generates() == b || b.generates() == a {
            ElementRelation::Generating
        } else {
            ElementRelation::Controlling
        }
    }
}

/// How often each element occurs across a chart.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementBalance([u8; 5]);

impl ElementBalance {
    pub fn add(&mut self, element: Element) {
        self.0[element.index()] += 1;
    }

    pub fn count(&self, element: Element) -> u8 {
        self.0[element.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&c| c as u32).sum()
    }

    /// Most frequent element. Ties go to the element later in generating
    /// order (wood, fire, earth, metal, water).
    pub fn dominant(&self) -> Element {
        Element::ALL
            .into_iter()
            .max_by_key(|e| self.count(*e))
            .unwrap_or(Element::Wood)
    }

    /// Elements that never occur.
    pub fn missing(&self) -> Vec<Element> {
        Element::ALL
            .into_iter()
            .filter(|e| self.count(*e) == 0)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, u8)> + '_ {
        Element::ALL.into_iter().map(move |e| (e, self.count(e)))
    }
}

impl FromIterator<Element> for ElementBalance {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut balance = ElementBalance::default();
        for element in iter {
            balance.add(element);
        }
        balance
    }
}

// Serialized as `{"wood": n, "fire": n, ...}`.
impl Serialize for ElementBalance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(5))?;
        for (element, count) in self.iter() {
            map.serialize_entry(&element, &count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ElementBalance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let counts = std::collections::BTreeMap::<Element, u8>::deserialize(deserializer)?;
        let mut balance = ElementBalance::default();
        for (element, count) in counts {
            balance.0[element.index()] = count;
        }
        Ok(balance)
    }
}
