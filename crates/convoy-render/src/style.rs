/// Marker geometry for a node class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Square,
    Circle,
}

/// Resolved drawing style for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub fill: String,
    pub stroke: String,
    /// Marker area before size-band scaling, in squared canvas units.
    pub base_area: f64,
}

/// Immutable styling policy injected into the renderers.
///
/// All color decisions flow through this value so tests can swap in a
/// reduced palette and assert on exact assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct StylePolicy {
    /// Cyclic vehicle palette; index wraps for fleets larger than it.
    pub vehicle_palette: Vec<String>,
    pub network_edge_color: String,
    /// Opacity of route arrows in the static diagram.
    pub route_opacity: f64,
    /// Opacity of completed vehicles' routes in animation frames.
    pub history_opacity: f64,
}

impl Default for StylePolicy {
    fn default() -> Self {
        Self {
            vehicle_palette: ["blue", "green", "purple", "cyan", "magenta"]
                .map(str::to_string)
                .to_vec(),
            network_edge_color: "lightgray".to_string(),
            route_opacity: 0.8,
            history_opacity: 0.4,
        }
    }
}

impl StylePolicy {
    /// Color for the vehicle at `index` in route declaration order.
    pub fn vehicle_color(&self, index: usize) -> &str {
        &self.vehicle_palette[index % self.vehicle_palette.len()]
    }

    /// Marker style derived purely from priority. `None` is the
    /// route-only case where inputs carry no attributes at all.
    pub fn node_style(&self, priority: Option<u32>) -> MarkerStyle {
        match priority {
            Some(0) => MarkerStyle {
                shape: MarkerShape::Square,
                fill: "black".to_string(),
                stroke: "white".to_string(),
                base_area: 500.0,
            },
            Some(p) if p >= 4 => MarkerStyle {
                shape: MarkerShape::Circle,
                fill: "red".to_string(),
                stroke: "darkred".to_string(),
                base_area: 200.0 + 50.0 * f64::from(p),
            },
            Some(3) => MarkerStyle {
                shape: MarkerShape::Circle,
                fill: "orange".to_string(),
                stroke: "black".to_string(),
                base_area: 350.0,
            },
            Some(p) => MarkerStyle {
                shape: MarkerShape::Circle,
                fill: "yellow".to_string(),
                stroke: "black".to_string(),
                base_area: 200.0 + 50.0 * f64::from(p),
            },
            None => MarkerStyle {
                shape: MarkerShape::Circle,
                fill: "lightgray".to_string(),
                stroke: "gray".to_string(),
                base_area: 500.0,
            },
        }
    }
}
