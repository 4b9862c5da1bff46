//! Profile completeness.

use crate::models::User;

/// The nine profile fields required before food logging is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Age,
    Name,
    Goal,
    Sex,
    Height,
    Weight,
    PhysicalActivityLevel,
    DietaryRestrictions,
    Diseases,
}

impl ProfileField {
    /// All fields in the order they are asked for.
    pub const ALL: [ProfileField; 9] = [
        ProfileField::Age,
        ProfileField::Name,
        ProfileField::Goal,
        ProfileField::Sex,
        ProfileField::Height,
        ProfileField::Weight,
        ProfileField::PhysicalActivityLevel,
        ProfileField::DietaryRestrictions,
        ProfileField::Diseases,
    ];

    /// Field name as it appears in serialized profiles and tool arguments.
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::Age => "age",
            ProfileField::Name => "name",
            ProfileField::Goal => "goal",
            ProfileField::Sex => "sex",
            ProfileField::Height => "height",
            ProfileField::Weight => "weight",
            ProfileField::PhysicalActivityLevel => "physicalActivityLevel",
            ProfileField::DietaryRestrictions => "dietaryRestrictions",
            ProfileField::Diseases => "diseases",
        }
    }

    /// Parse a field name from user input or a tool argument key.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "age" | "edad" => Some(ProfileField::Age),
            "name" | "nombre" => Some(ProfileField::Name),
            "goal" | "goals" | "objetivo" => Some(ProfileField::Goal),
            "sex" | "sexo" => Some(ProfileField::Sex),
            "height" | "altura" => Some(ProfileField::Height),
            "weight" | "peso" => Some(ProfileField::Weight),
            "physicalactivitylevel" | "physical_activity_level" | "activity" => {
                Some(ProfileField::PhysicalActivityLevel)
            }
            "dietaryrestrictions" | "dietary_restrictions" => {
                Some(ProfileField::DietaryRestrictions)
            }
            "diseases" | "enfermedades" => Some(ProfileField::Diseases),
            _ => None,
        }
    }

    /// Spanish label shown to the user.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProfileField::Age => "edad",
            ProfileField::Name => "nombre",
            ProfileField::Goal => "objetivo",
            ProfileField::Sex => "sexo",
            ProfileField::Height => "altura",
            ProfileField::Weight => "peso",
            ProfileField::PhysicalActivityLevel => "nivel de actividad física",
            ProfileField::DietaryRestrictions => "restricciones alimentarias",
            ProfileField::Diseases => "enfermedades",
        }
    }

    /// Whether the user has a usable value for this field.
    pub fn is_present(&self, user: &User) -> bool {
        match self {
            ProfileField::Age => user.age.is_some_and(|age| age > 0),
            ProfileField::Name => user.name.as_deref().is_some_and(|n| !n.trim().is_empty()),
            ProfileField::Goal => user.goal.as_ref().is_some_and(|g| !g.is_empty()),
            ProfileField::Sex => user.sex.is_some(),
            ProfileField::Height => user.height.is_some_and(|h| h.is_finite() && h > 0.0),
            ProfileField::Weight => user.weight.is_some_and(|w| w.is_finite() && w > 0.0),
            ProfileField::PhysicalActivityLevel => user.physical_activity_level.is_some(),
            // An empty list is an answer ("none").
            ProfileField::DietaryRestrictions => user.dietary_restrictions.is_some(),
            ProfileField::Diseases => user.diseases.is_some(),
        }
    }
}

impl User {
    /// Fields still missing, in asking order.
    pub fn missing_fields(&self) -> Vec<ProfileField> {
        ProfileField::ALL
            .into_iter()
            .filter(|field| !field.is_present(self))
            .collect()
    }

    /// Whether all nine profile fields are present.
    pub fn is_complete(&self) -> bool {
        ProfileField::ALL.iter().all(|field| field.is_present(self))
    }
}
