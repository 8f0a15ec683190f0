//! Feature list panel and legend, derived from the visible feature set.

use geoscribe_geo::GeometryType;
use serde::Serialize;

use crate::model::{Feature, FeatureId, VisibilityFilter};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: FeatureId,
    pub label: String,
    pub selected: bool,
    pub hovered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroup {
    pub geometry_type: GeometryType,
    /// e.g. "Polygons (3)"
    pub header: String,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub geometry_type: GeometryType,
    pub label: &'static str,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub search: String,
    /// Non-empty groups in Point, LineString, Polygon order
    pub groups: Vec<ListGroup>,
    /// A search is active and nothing matched
    pub no_results: bool,
    pub legend: Vec<LegendEntry>,
}

impl ListView {
    /// Build the panel from the already filtered visible set.
    pub fn build(
        visible: &[&Feature],
        filter: &VisibilityFilter,
        search: &str,
        selected: Option<&FeatureId>,
        hovered: Option<&FeatureId>,
    ) -> Self {
        let needle = search.to_lowercase();
        let matches: Vec<&Feature> = visible
            .iter()
            .copied()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .collect();

        let groups: Vec<ListGroup> = GeometryType::all()
            .iter()
            .filter_map(|&ty| {
                let items: Vec<ListItem> = matches
                    .iter()
                    .filter(|f| f.geometry_type() == ty)
                    .map(|f| ListItem {
                        id: f.id.clone(),
                        label: f.label(),
                        selected: selected == Some(&f.id),
                        hovered: hovered == Some(&f.id),
                    })
                    .collect();
                (!items.is_empty()).then(|| ListGroup {
                    geometry_type: ty,
                    header: format!("{}s ({})", ty.name(), items.len()),
                    items,
                })
            })
            .collect();

        Self {
            search: search.to_string(),
            no_results: groups.is_empty() && !search.is_empty(),
            groups,
            legend: legend(filter),
        }
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn ids(&self) -> impl Iterator<Item = &FeatureId> {
        self.groups.iter().flat_map(|g| g.items.iter().map(|i| &i.id))
    }
}

pub fn legend(filter: &VisibilityFilter) -> Vec<LegendEntry> {
    GeometryType::all()
        .iter()
        .map(|&ty| LegendEntry {
            geometry_type: ty,
            label: legend_label(ty),
            visible: filter.is_visible(ty),
        })
        .collect()
}

fn legend_label(geometry_type: GeometryType) -> &'static str {
    match geometry_type {
        GeometryType::Point => "Points",
        GeometryType::LineString => "Lines",
        GeometryType::Polygon => "Polygons",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoscribe_geo::{Coord, Geometry};

    fn point(id: i64, name: &str) -> Feature {
        Feature::new(FeatureId::Number(id), name, Geometry::point(0.0, 0.0))
    }

    fn line(id: i64, name: &str) -> Feature {
        let coords = vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }];
        Feature::new(FeatureId::Number(id), name, Geometry::line_string(coords))
    }

    fn polygon(id: i64, name: &str) -> Feature {
        let coords = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
        ];
        Feature::new(FeatureId::Number(id), name, Geometry::polygon(coords))
    }

    #[test]
    fn test_groups_in_fixed_order() {
        let features = [polygon(1, "Park"), point(2, "Well"), line(3, "Road"), point(4, "")];
        let visible: Vec<&Feature> = features.iter().collect();
        let view = ListView::build(&visible, &VisibilityFilter::default(), "", None, None);

        let headers: Vec<&str> = view.groups.iter().map(|g| g.header.as_str()).collect();
        assert_eq!(headers, ["Points (2)", "LineStrings (1)", "Polygons (1)"]);
        assert_eq!(view.groups[0].items[1].label, "ID: 4");
        assert!(!view.no_results);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let features = [point(1, "Old Well"), point(2, "Mill"), line(3, "Wellington Road")];
        let visible: Vec<&Feature> = features.iter().collect();
        let view = ListView::build(&visible, &VisibilityFilter::default(), "WELL", None, None);

        let ids: Vec<&FeatureId> = view.ids().collect();
        assert_eq!(ids, [&FeatureId::Number(1), &FeatureId::Number(3)]);
    }

    #[test]
    fn test_unnamed_features_only_match_empty_search() {
        let features = [point(1, "")];
        let visible: Vec<&Feature> = features.iter().collect();
        let view = ListView::build(&visible, &VisibilityFilter::default(), "1", None, None);
        assert!(view.no_results);
    }

    #[test]
    fn test_empty_store_without_search_is_not_no_results() {
        let view = ListView::build(&[], &VisibilityFilter::default(), "", None, None);
        assert!(view.groups.is_empty());
        assert!(!view.no_results);
    }

    #[test]
    fn test_marks_selected_and_hovered() {
        let features = [point(1, "A"), point(2, "B")];
        let visible: Vec<&Feature> = features.iter().collect();
        let one = FeatureId::Number(1);
        let two = FeatureId::Number(2);
        let view = ListView::build(&visible, &VisibilityFilter::default(), "", Some(&one), Some(&two));

        let items = &view.groups[0].items;
        assert!(items[0].selected && !items[0].hovered);
        assert!(items[1].hovered && !items[1].selected);
    }

    #[test]
    fn test_legend_reflects_filter() {
        let mut filter = VisibilityFilter::default();
        filter.toggle(GeometryType::Polygon);

        let entries = legend(&filter);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].label, "Lines");
        assert!(!entries[2].visible);
    }
}
