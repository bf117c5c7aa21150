//! Region Views
//! The four geographic views, their fixed member lists, default sub-region
//! selections and per-view map framing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// US states plus the District of Columbia.
pub const STATES: [&str; 51] = [
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado",
    "Connecticut", "Delaware", "District of Columbia", "Florida", "Georgia",
    "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa", "Kansas", "Kentucky",
    "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan",
    "Minnesota", "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada",
    "New Hampshire", "New Jersey", "New Mexico", "New York", "North Carolina",
    "North Dakota", "Ohio", "Oklahoma", "Oregon", "Pennsylvania",
    "Rhode Island", "South Carolina", "South Dakota", "Tennessee", "Texas",
    "Utah", "Vermont", "Virginia", "Washington", "West Virginia",
    "Wisconsin", "Wyoming",
];

pub const EUROPE: [&str; 46] = [
    "Albania", "Andorra", "Austria", "Belarus", "Belgium",
    "Bosnia and Herzegovina", "Bulgaria", "Croatia", "Cyprus",
    "Czech Republic", "Denmark", "Estonia", "Finland", "France", "Germany",
    "Greece", "Hungary", "Iceland", "Ireland", "Italy", "Kosovo", "Latvia",
    "Liechtenstein", "Lithuania", "Luxembourg", "Malta", "Moldova", "Monaco",
    "Montenegro", "Netherlands", "North Macedonia", "Norway", "Poland",
    "Portugal", "Romania", "San Marino", "Serbia", "Slovakia", "Slovenia",
    "Spain", "Sweden", "Switzerland", "Turkey", "Ukraine", "United Kingdom",
    "Vatican City",
];

pub const CHINA: [&str; 33] = [
    "Anhui", "Beijing", "Chongqing", "Fujian", "Gansu", "Guangdong",
    "Guangxi", "Guizhou", "Hainan", "Hebei", "Heilongjiang", "Henan",
    "Hong Kong", "Hubei", "Hunan", "Inner Mongolia", "Jiangsu", "Jiangxi",
    "Jilin", "Liaoning", "Macau", "Ningxia", "Qinghai", "Shaanxi",
    "Shandong", "Shanghai", "Shanxi", "Sichuan", "Tianjin", "Tibet",
    "Xinjiang", "Yunnan", "Zhejiang",
];

/// Map framing for a view: where the map chart centers, how far it spans and
/// how marker areas are scaled down.
#[derive(Debug, Clone, Copy)]
pub struct MapFrame {
    pub center_lon: f64,
    pub center_lat: f64,
    /// Half-width of the longitude window, degrees.
    pub lon_span: f64,
    /// Half-height of the latitude window, degrees.
    pub lat_span: f64,
    /// Divisor applied to sqrt(confirmed) marker sizes.
    pub sizeref: f64,
}

/// One of the four geographic views of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionView {
    Worldwide,
    UnitedStates,
    Europe,
    China,
}

impl Default for RegionView {
    fn default() -> Self {
        RegionView::Worldwide
    }
}

impl fmt::Display for RegionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl RegionView {
    pub const ALL: [RegionView; 4] = [
        RegionView::Worldwide,
        RegionView::UnitedStates,
        RegionView::Europe,
        RegionView::China,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegionView::Worldwide => "Worldwide",
            RegionView::UnitedStates => "United States",
            RegionView::Europe => "Europe",
            RegionView::China => "China",
        }
    }

    /// Fixed member list for the view. Worldwide has no fixed list; its
    /// members come from the worldwide table's distinct regions.
    pub fn members(&self) -> Option<&'static [&'static str]> {
        match self {
            RegionView::Worldwide => None,
            RegionView::UnitedStates => Some(&STATES),
            RegionView::Europe => Some(&EUROPE),
            RegionView::China => Some(&CHINA),
        }
    }

    /// Hand-picked default sub-region selection for the comparison chart.
    pub fn default_selection(&self) -> &'static [&'static str] {
        match self {
            RegionView::Worldwide => &[
                "US", "Italy", "United Kingdom", "Spain", "Russia", "Brazil",
                "Sweden", "Belgium", "Peru", "India", "Lithuania",
            ],
            RegionView::UnitedStates => &[
                "New York", "New Jersey", "California", "Texas", "Florida",
                "Mississippi", "Arizona", "Louisiana", "Colorado",
            ],
            RegionView::Europe => &[
                "France", "Germany", "Italy", "Spain", "United Kingdom",
                "Belgium", "Sweden", "Lithuania",
            ],
            RegionView::China => &[
                "Hubei", "Guangdong", "Xinjiang", "Zhejiang", "Hunan",
                "Hong Kong", "Macau",
            ],
        }
    }

    pub fn map_frame(&self) -> MapFrame {
        match self {
            RegionView::Worldwide => MapFrame {
                center_lon: 10.0,
                center_lat: 15.0,
                lon_span: 180.0,
                lat_span: 90.0,
                sizeref: 35.0,
            },
            RegionView::UnitedStates => MapFrame {
                center_lon: -96.0,
                center_lat: 38.0,
                lon_span: 32.0,
                lat_span: 16.0,
                sizeref: 7.0,
            },
            RegionView::Europe => MapFrame {
                center_lon: 15.0,
                center_lat: 52.0,
                lon_span: 28.0,
                lat_span: 16.0,
                sizeref: 15.0,
            },
            RegionView::China => MapFrame {
                center_lon: 104.0,
                center_lat: 35.0,
                lon_span: 32.0,
                lat_span: 18.0,
                sizeref: 3.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn united_states_view_lists_exactly_the_states() {
        let members = RegionView::UnitedStates.members().unwrap();
        assert_eq!(members.len(), 51);
        assert!(members.contains(&"District of Columbia"));
        assert!(!members.contains(&"Puerto Rico"));
    }

    #[test]
    fn worldwide_members_come_from_data() {
        assert!(RegionView::Worldwide.members().is_none());
    }

    #[test]
    fn default_selections_are_members_of_their_view() {
        for view in [RegionView::UnitedStates, RegionView::Europe, RegionView::China] {
            let members = view.members().unwrap();
            for picked in view.default_selection() {
                assert!(members.contains(picked), "{picked} not in {view}");
            }
        }
    }

    #[test]
    fn sizeref_matches_view() {
        assert_eq!(RegionView::Worldwide.map_frame().sizeref, 35.0);
        assert_eq!(RegionView::UnitedStates.map_frame().sizeref, 7.0);
        assert_eq!(RegionView::Europe.map_frame().sizeref, 15.0);
        assert_eq!(RegionView::China.map_frame().sizeref, 3.0);
    }
}
