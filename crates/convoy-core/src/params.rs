/// Hard ceiling on layout size. Above this the pipeline skips the
/// diagram instead of spending minutes on a force layout nobody can
/// read anyway.
pub const MAX_LAYOUT_NODES: usize = 500;

/// Largest node count that still gets the compact canvas.
pub const COMPACT_NODE_LIMIT: usize = 50;

/// Render parameters adapted to graph size.
///
/// Three bands: compact (readable markers and labels), reduced (big
/// canvas, small markers), and sparse (reduced plus labels off). Values
/// within a band are fixed; only `spring_constant` varies with the
/// node count.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Marker area for an unstyled node, in squared canvas units.
    pub node_area: f64,
    pub font_size: f64,
    pub line_width: f64,
    pub arrow_size: f64,
    pub draw_labels: bool,
    /// Ideal edge length hint for the layout engine; `None` lets the
    /// engine derive one from the node count.
    pub spring_constant: Option<f64>,
}

impl RenderParams {
    pub fn for_node_count(n: usize) -> Self {
        if n <= COMPACT_NODE_LIMIT {
            return Self {
                canvas_width: 1000.0,
                canvas_height: 800.0,
                node_area: 500.0,
                font_size: 10.0,
                line_width: 1.5,
                arrow_size: 20.0,
                draw_labels: true,
                spring_constant: None,
            };
        }
        Self {
            canvas_width: 2400.0,
            canvas_height: 2400.0,
            node_area: 50.0,
            font_size: 6.0,
            line_width: 0.5,
            arrow_size: 10.0,
            draw_labels: n <= MAX_LAYOUT_NODES,
            spring_constant: Some(2.5 / (n as f64).sqrt()),
        }
    }

    /// Scale factor styled markers multiply their base area by, so the
    /// reduced bands shrink priority markers proportionally.
    pub fn marker_scale(&self) -> f64 {
        self.node_area / 500.0
    }
}

/// True when a graph of `n` nodes is too large to lay out and render.
pub fn exceeds_layout_limit(n: usize) -> bool {
    n > MAX_LAYOUT_NODES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_constant_within_and_shrink_between() {
        let compact = RenderParams::for_node_count(10);
        assert_eq!(compact, RenderParams::for_node_count(50));
        assert_eq!(compact.node_area, 500.0);
        assert!(compact.spring_constant.is_none());

        let reduced = RenderParams::for_node_count(51);
        assert!(reduced.node_area < compact.node_area);
        assert!(reduced.font_size < compact.font_size);
        assert!(reduced.line_width < compact.line_width);
        assert!(reduced.arrow_size < compact.arrow_size);
        assert!(reduced.draw_labels);
        let k = reduced.spring_constant.unwrap();
        assert!((k - 2.5 / (51.0f64).sqrt()).abs() < 1e-12);

        let sparse = RenderParams::for_node_count(501);
        assert!(!sparse.draw_labels);
        assert_eq!(sparse.node_area, reduced.node_area);
    }

    #[test]
    fn layout_limit_cuts_at_exactly_five_hundred() {
        assert!(!exceeds_layout_limit(500));
        assert!(exceeds_layout_limit(501));
    }
}
