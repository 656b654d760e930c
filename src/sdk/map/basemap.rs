/// The fixed set of basemap styles offered by the switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Basemap {
    Streets,
    SatelliteStreets,
    Dark,
    NavigationDay,
    #[default]
    NavigationNight,
}

impl Basemap {
    pub const ALL: [Basemap; 5] = [
        Basemap::SatelliteStreets,
        Basemap::Dark,
        Basemap::NavigationDay,
        Basemap::NavigationNight,
        Basemap::Streets,
    ];

    pub fn style_id(&self) -> &'static str {
        match self {
            Basemap::Streets => "streets-v12",
            Basemap::SatelliteStreets => "satellite-streets-v12",
            Basemap::Dark => "dark-v11",
            Basemap::NavigationDay => "navigation-day-v1",
            Basemap::NavigationNight => "navigation-night-v1",
        }
    }

    pub fn style_url(&self) -> String {
        format!("mapbox://styles/mapbox/{}", self.style_id())
    }

    /// Button label in the switcher.
    pub fn label(&self) -> &'static str {
        match self {
            Basemap::Streets => "Default",
            Basemap::SatelliteStreets => "Satellite",
            Basemap::Dark => "Dark",
            Basemap::NavigationDay => "Nav",
            Basemap::NavigationNight => "Dark Nav",
        }
    }

    pub fn from_style_id(id: &str) -> Option<Basemap> {
        Basemap::ALL.into_iter().find(|b| b.style_id() == id)
    }
}
