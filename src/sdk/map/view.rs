//! The map view model: camera, basemap, registered layers, selection state,
//! and the route display. One instance models one map canvas; every user
//! action funnels through here so the view always reflects the latest one.

use super::basemap::Basemap;
use super::cluster::{ClusterIndex, MapFeature};
use super::layers::{
    StyleRegistry, Visibility, CAMPSITES_SOURCE, CAMPSITE_LAYERS, CLUSTERS_LAYER,
    CLUSTER_COUNT_LAYER, ROUTE_LAYER, ROUTE_SOURCE, UNCLUSTERED_LAYER,
};
use crate::sdk::campsites::CampSite;
use crate::sdk::geo::LngLat;
use crate::sdk::routing::{Route, RoutingError};

pub const INITIAL_CENTER: LngLat = LngLat {
    lon: -95.7129,
    lat: 37.0902,
};
pub const INITIAL_ZOOM: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Searching,
    RouteDisplayed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
}

impl Camera {
    pub fn ease_to(&mut self, center: LngLat, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    /// Recenter without changing zoom.
    pub fn fly_to(&mut self, center: LngLat) {
        self.center = center;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Green,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub coord: LngLat,
    pub color: MarkerColor,
}

/// What a map click produced, for the caller to render.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    ZoomedToCluster { center: LngLat, zoom: u8 },
    Popup { site_index: usize, html: String },
}

pub struct MapView {
    camera: Camera,
    basemap: Basemap,
    registry: StyleRegistry,
    state: ViewState,
    sites: Vec<CampSite>,
    clusters: ClusterIndex,
    campsites_visible: bool,
    start: Option<LngLat>,
    end: Option<LngLat>,
    markers: Vec<Marker>,
    route: Option<Route>,
}

impl MapView {
    pub fn new(sites: Vec<CampSite>) -> Self {
        let clusters = ClusterIndex::new(sites.iter().map(|s| s.coord).collect());
        let mut view = Self {
            camera: Camera {
                center: INITIAL_CENTER,
                zoom: INITIAL_ZOOM,
            },
            basemap: Basemap::default(),
            registry: StyleRegistry::default(),
            state: ViewState::Idle,
            sites,
            clusters,
            campsites_visible: true,
            start: None,
            end: None,
            markers: Vec::new(),
            route: None,
        };
        view.on_style_load();
        view
    }

    /// Registers sources and layers. Runs once on mount and again after
    /// every style load; existence guards make the re-run harmless.
    pub fn on_style_load(&mut self) {
        self.registry.add_source(CAMPSITES_SOURCE);
        let campsites = Visibility::from_flag(self.campsites_visible);
        self.registry
            .add_layer(CLUSTERS_LAYER, CAMPSITES_SOURCE, campsites);
        self.registry
            .add_layer(CLUSTER_COUNT_LAYER, CAMPSITES_SOURCE, campsites);
        self.registry
            .add_layer(UNCLUSTERED_LAYER, CAMPSITES_SOURCE, campsites);
        if self.route.is_some() {
            self.registry.add_source(ROUTE_SOURCE);
            self.registry
                .add_layer(ROUTE_LAYER, ROUTE_SOURCE, Visibility::Visible);
        }
    }

    /// Swapping the basemap is a full style replace: the style forgets all
    /// sources and layers, so they are re-registered immediately.
    pub fn set_basemap(&mut self, basemap: Basemap) {
        self.basemap = basemap;
        self.registry.clear();
        self.on_style_load();
    }

    /// Flips the campsite layer flag and applies it to all three campsite
    /// layers. Independent of whether any data is loaded.
    pub fn toggle_campsites(&mut self) {
        self.campsites_visible = !self.campsites_visible;
        self.apply_campsite_visibility();
    }

    fn apply_campsite_visibility(&mut self) {
        let visibility = Visibility::from_flag(self.campsites_visible);
        for id in CAMPSITE_LAYERS {
            self.registry.set_visibility(id, visibility);
        }
    }

    /// Handles a click on the canvas. A click over empty space does
    /// nothing; a cluster eases the camera to its expansion zoom; a site
    /// becomes the route end and opens its popup.
    pub fn click(&mut self, at: &LngLat) -> Option<ClickOutcome> {
        match self.clusters.hit_test(self.camera.zoom.floor() as u8, at)? {
            MapFeature::Cluster { zoom, index, center, .. } => {
                let expansion = self.clusters.expansion_zoom(zoom, index)?;
                self.camera.ease_to(center, expansion as f64);
                Some(ClickOutcome::ZoomedToCluster {
                    center,
                    zoom: expansion,
                })
            }
            MapFeature::Site { index, coord } => {
                self.end = Some(coord);
                Some(ClickOutcome::Popup {
                    site_index: index,
                    html: self.sites[index].popup_html(),
                })
            }
        }
    }

    /// A geocode selection becomes the route start.
    pub fn select_start(&mut self, coord: LngLat) {
        self.start = Some(coord);
        self.state = ViewState::Idle;
    }

    pub fn begin_search(&mut self) {
        if self.state != ViewState::RouteDisplayed {
            self.state = ViewState::Searching;
        }
    }

    /// Displays a route: replaces any previous route wholesale, drops
    /// start/end markers, hides the campsite layers, and recenters the
    /// camera on the midpoint of the route bounds.
    pub fn show_route(&mut self, route: Route) -> Result<(), RoutingError> {
        let start = self.start.ok_or(RoutingError::MissingEndpoint("start"))?;
        let end = self.end.ok_or(RoutingError::MissingEndpoint("end"))?;

        if self.registry.add_source(ROUTE_SOURCE) {
            self.registry
                .add_layer(ROUTE_LAYER, ROUTE_SOURCE, Visibility::Visible);
        }
        // an existing route source just gets new data

        self.markers = vec![
            Marker {
                coord: start,
                color: MarkerColor::Green,
            },
            Marker {
                coord: end,
                color: MarkerColor::Blue,
            },
        ];

        self.campsites_visible = false;
        self.apply_campsite_visibility();

        if let Some(bounds) = route.bounds() {
            self.camera.fly_to(bounds.center());
        }

        self.route = Some(route);
        self.state = ViewState::RouteDisplayed;
        Ok(())
    }

    /// Clears selection, markers, and the route; campsite layers come back.
    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
        self.markers.clear();
        self.route = None;
        self.campsites_visible = true;
        self.apply_campsite_visibility();
        self.state = ViewState::Idle;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Programmatic camera move, e.g. jumping to a searched place.
    pub fn ease_camera(&mut self, center: LngLat, zoom: f64) {
        self.camera.ease_to(center, zoom);
    }

    pub fn basemap(&self) -> Basemap {
        self.basemap
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn start(&self) -> Option<LngLat> {
        self.start
    }

    pub fn end(&self) -> Option<LngLat> {
        self.end
    }

    pub fn set_end(&mut self, coord: LngLat) {
        self.end = Some(coord);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn sites(&self) -> &[CampSite] {
        &self.sites
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.registry.has_layer(id)
    }

    pub fn layer_visibility(&self, id: &str) -> Option<Visibility> {
        self.registry.visibility(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::campsites::parse_campsites;
    use crate::sdk::routing::RouteStep;

    fn sample_view() -> MapView {
        let sites = parse_campsites(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": { "name": "Elk River Campground" },
                        "geometry": { "type": "Point", "coordinates": [-94.0, 36.5] }
                    },
                    {
                        "type": "Feature",
                        "properties": { "name": "Cedar Hollow" },
                        "geometry": { "type": "Point", "coordinates": [-94.01, 36.51] }
                    }
                ]
            }"#,
        )
        .unwrap();
        MapView::new(sites)
    }

    fn sample_route() -> Route {
        Route {
            coords: vec![LngLat::new(-95.0, 37.0), LngLat::new(-94.0, 36.5)],
            distance_m: 16093.0,
            duration_s: 1200.0,
            steps: vec![RouteStep {
                instruction: "Drive east.".to_string(),
                distance_m: 16093.0,
            }],
        }
    }

    #[test]
    fn mount_registers_campsite_layers_once() {
        let mut view = sample_view();
        assert!(view.has_layer(CLUSTERS_LAYER));
        assert!(view.has_layer(CLUSTER_COUNT_LAYER));
        assert!(view.has_layer(UNCLUSTERED_LAYER));
        // a second style-load signal must not duplicate or reset anything
        view.toggle_campsites();
        view.on_style_load();
        assert_eq!(
            view.layer_visibility(CLUSTERS_LAYER),
            Some(Visibility::None)
        );
    }

    #[test]
    fn toggling_the_campsite_layer_twice_restores_visibility() {
        let mut view = sample_view();
        let before = view.layer_visibility(CLUSTERS_LAYER).unwrap();
        view.toggle_campsites();
        assert_ne!(view.layer_visibility(CLUSTERS_LAYER).unwrap(), before);
        view.toggle_campsites();
        assert_eq!(view.layer_visibility(CLUSTERS_LAYER).unwrap(), before);
    }

    #[test]
    fn route_with_unset_start_is_a_validation_error_not_a_crash() {
        let mut view = sample_view();
        view.set_end(LngLat::new(-94.0, 36.5));
        let err = view.show_route(sample_route()).unwrap_err();
        assert!(matches!(err, RoutingError::MissingEndpoint("start")));
        assert_eq!(view.state(), ViewState::Idle);
    }

    #[test]
    fn showing_a_route_hides_campsites_and_recenters() {
        let mut view = sample_view();
        view.select_start(LngLat::new(-95.0, 37.0));
        view.set_end(LngLat::new(-94.0, 36.5));
        view.show_route(sample_route()).unwrap();

        assert_eq!(view.state(), ViewState::RouteDisplayed);
        assert_eq!(
            view.layer_visibility(CLUSTERS_LAYER),
            Some(Visibility::None)
        );
        assert!(view.has_layer(ROUTE_LAYER));
        assert_eq!(view.markers().len(), 2);
        assert_eq!(view.markers()[0].color, MarkerColor::Green);
        assert_eq!(view.markers()[1].color, MarkerColor::Blue);

        let center = view.camera().center;
        assert!((center.lon - -94.5).abs() < 1e-9);
        assert!((center.lat - 36.75).abs() < 1e-9);
        // flyTo keeps the zoom
        assert_eq!(view.camera().zoom, INITIAL_ZOOM);
    }

    #[test]
    fn a_new_route_replaces_the_old_one_wholesale() {
        let mut view = sample_view();
        view.select_start(LngLat::new(-95.0, 37.0));
        view.set_end(LngLat::new(-94.0, 36.5));
        view.show_route(sample_route()).unwrap();

        let mut second = sample_route();
        second.distance_m = 32000.0;
        second.steps.clear();
        view.show_route(second).unwrap();

        let route = view.route().unwrap();
        assert_eq!(route.distance_m, 32000.0);
        assert!(route.steps.is_empty());
        assert_eq!(view.markers().len(), 2);
    }

    #[test]
    fn basemap_swap_preserves_data_layers_and_the_route() {
        let mut view = sample_view();
        view.select_start(LngLat::new(-95.0, 37.0));
        view.set_end(LngLat::new(-94.0, 36.5));
        view.show_route(sample_route()).unwrap();
        view.toggle_campsites(); // campsites back on while route shows

        view.set_basemap(Basemap::SatelliteStreets);

        assert_eq!(view.basemap(), Basemap::SatelliteStreets);
        assert!(view.has_layer(CLUSTERS_LAYER));
        assert!(view.has_layer(ROUTE_LAYER), "route must survive a restyle");
        assert!(view.route().is_some());
        assert_eq!(
            view.layer_visibility(CLUSTERS_LAYER),
            Some(Visibility::Visible)
        );
    }

    #[test]
    fn click_on_empty_space_is_a_no_op() {
        let mut view = sample_view();
        let before = *view.camera();
        assert!(view.click(&LngLat::new(150.0, -40.0)).is_none());
        assert_eq!(*view.camera(), before);
        assert!(view.end().is_none());
    }

    #[test]
    fn clicking_a_cluster_eases_to_its_expansion_zoom() {
        let mut view = sample_view();
        // at zoom 4 the two nearby sites form one cluster
        let outcome = view.click(&LngLat::new(-94.0, 36.5)).unwrap();
        match outcome {
            ClickOutcome::ZoomedToCluster { zoom, .. } => {
                assert!(f64::from(zoom) > INITIAL_ZOOM);
                assert_eq!(view.camera().zoom, f64::from(zoom));
            }
            other => panic!("expected a cluster zoom, got {:?}", other),
        }
    }

    #[test]
    fn clicking_a_site_sets_the_end_and_opens_a_popup() {
        let mut view = sample_view();
        // past the cluster max zoom both sites render individually
        view.camera.zoom = 16.0;
        let outcome = view.click(&LngLat::new(-94.0, 36.5)).unwrap();
        match outcome {
            ClickOutcome::Popup { html, .. } => {
                assert!(html.contains("Elk River Campground"));
            }
            other => panic!("expected a popup, got {:?}", other),
        }
        assert_eq!(view.end(), Some(LngLat::new(-94.0, 36.5)));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut view = sample_view();
        view.select_start(LngLat::new(-95.0, 37.0));
        view.set_end(LngLat::new(-94.0, 36.5));
        view.show_route(sample_route()).unwrap();
        view.reset();

        assert_eq!(view.state(), ViewState::Idle);
        assert!(view.start().is_none() && view.end().is_none());
        assert!(view.route().is_none());
        assert!(view.markers().is_empty());
        assert_eq!(
            view.layer_visibility(CLUSTERS_LAYER),
            Some(Visibility::Visible)
        );
    }
}
