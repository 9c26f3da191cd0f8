use crate::data::student::Student;
use serde::Deserialize;
use std::collections::BTreeSet;

/// The radio buttons above the table: they either sort or narrow by gender, never both.
#[derive(Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingFilter {
    #[default]
    All,
    Name,
    Male,
    Female,
}

impl ListingFilter {
    pub const ALL: [Self; 4] = [Self::All, Self::Name, Self::Male, Self::Female];

    pub const fn value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Name => "name",
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Name => "Sort by Name",
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Filter inputs as sent by the page.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct RosterQuery {
    #[serde(default)]
    pub filter: ListingFilter,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterView {
    pub sort_by_name: bool,
    pub program: Option<String>,
    pub gender: Option<Gender>,
    /// Already lowercased.
    pub search: Option<String>,
}

impl From<RosterQuery> for RosterView {
    fn from(RosterQuery { filter, program, search }: RosterQuery) -> Self {
        let search = search.trim().to_lowercase();
        Self {
            sort_by_name: filter == ListingFilter::Name,
            program: Some(program).filter(|p| !p.is_empty()),
            gender: match filter {
                ListingFilter::Male => Some(Gender::Male),
                ListingFilter::Female => Some(Gender::Female),
                ListingFilter::All | ListingFilter::Name => None,
            },
            search: Some(search).filter(|s| !s.is_empty()),
        }
    }
}

impl RosterView {
    /// Sorts, then narrows by program, gender and name search, in that order.
    pub fn apply(&self, mut roster: Vec<Student>) -> Vec<Student> {
        if self.sort_by_name {
            roster.sort_by_cached_key(|s| (s.details.name.to_lowercase(), s.details.name.clone()));
        }

        if let Some(program) = &self.program {
            roster.retain(|s| &s.details.program == program);
        }

        if let Some(gender) = self.gender {
            roster.retain(|s| s.details.gender == gender.as_str());
        }

        if let Some(search) = &self.search {
            roster.retain(|s| s.details.name.to_lowercase().contains(search.as_str()));
        }

        roster
    }
}

/// Every distinct non-empty program, alphabetically.
pub fn programs(roster: &[Student]) -> Vec<String> {
    roster
        .iter()
        .map(|s| s.details.program.as_str())
        .filter(|p| !p.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}
