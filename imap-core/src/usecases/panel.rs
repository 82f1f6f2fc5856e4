use super::{
    engagement::{CommentView, EngagementStore, LikeOutcome},
    map_layers::Marker,
    prelude::*,
    recommend_nearby::recommend_nearby,
};
use crate::gateways::map::{MapHandle, ZoomLevel};

/// Flying to a report never zooms out further than this.
pub const FLY_TO_MIN_ZOOM: ZoomLevel = 14;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelTab {
    #[default]
    Nearby,
    Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyEntry {
    pub marker: Marker,
    pub distance: Distance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelDetails {
    pub marker: Marker,
    pub nearby: Vec<NearbyEntry>,
    pub sort_mode: CommentSortMode,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Closed,
    Open(Box<PanelDetails>),
}

/// The detail view of a selected report.
#[derive(Debug)]
pub struct Panel<M, S> {
    map: M,
    engagement: EngagementStore<S>,
    points: Vec<Marker>,
    state: PanelState,
    tab: PanelTab,
}

impl<M, S> Panel<M, S>
where
    M: MapHandle,
    S: EngagementStorage,
{
    pub fn new(map: M, engagement: EngagementStore<S>, points: Vec<Marker>) -> Self {
        Self {
            map,
            engagement,
            points,
            state: PanelState::Closed,
            tab: PanelTab::default(),
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn details(&self) -> Option<&PanelDetails> {
        match &self.state {
            PanelState::Open(details) => Some(&**details),
            PanelState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.details().is_some()
    }

    pub fn tab(&self) -> PanelTab {
        self.tab
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn engagement(&self) -> &EngagementStore<S> {
        &self.engagement
    }

    /// Replace the loaded point set, e.g. after a new report arrived.
    pub fn set_points(&mut self, points: Vec<Marker>) {
        self.points = points;
    }

    pub fn open(&mut self, marker: &Marker) -> Result<()> {
        let nearby = recommend_nearby(marker, &self.points)
            .into_iter()
            .map(|x| NearbyEntry {
                marker: x.item.clone(),
                distance: x.distance,
            })
            .collect();
        let sort_mode = self.engagement.sort_preference(&marker.id)?;
        let comments = self.engagement.list_comments_sorted(&marker.id, sort_mode)?;
        self.state = PanelState::Open(Box::new(PanelDetails {
            marker: marker.clone(),
            nearby,
            sort_mode,
            comments,
        }));
        Ok(())
    }

    /// Returns `false` if the id is not part of the loaded point set.
    pub fn open_by_id(&mut self, id: &Id, fly: bool) -> Result<bool> {
        let Some(marker) = self.points.iter().find(|m| &m.id == id).cloned() else {
            log::debug!("Report {id} is not on the map");
            return Ok(false);
        };
        if fly {
            let zoom = self.map.zoom().max(FLY_TO_MIN_ZOOM);
            self.map.fly_to(marker.pos, zoom);
        }
        self.open(&marker)?;
        Ok(true)
    }

    pub fn close(&mut self) {
        self.state = PanelState::Closed;
    }

    pub fn select_tab(&mut self, tab: PanelTab) {
        self.tab = tab;
    }

    fn open_report_id(&self) -> Option<Id> {
        self.details().map(|d| d.marker.id.clone())
    }

    fn refresh_comments(&mut self) -> Result<()> {
        if let PanelState::Open(details) = &mut self.state {
            details.comments = self
                .engagement
                .list_comments_sorted(&details.marker.id, details.sort_mode)?;
        }
        Ok(())
    }

    /// Comment on the open report; `None` if the panel is closed.
    pub fn submit_comment(&mut self, author: Option<&str>, text: &str) -> Result<Option<Comment>> {
        let Some(id) = self.open_report_id() else {
            return Ok(None);
        };
        let comment = self.engagement.submit_comment(&id, author, text)?;
        self.refresh_comments()?;
        Ok(Some(comment))
    }

    pub fn like_comment(&mut self, comment_id: CommentId) -> Result<Option<LikeOutcome>> {
        let Some(id) = self.open_report_id() else {
            return Ok(None);
        };
        let outcome = self.engagement.like_comment(&id, comment_id)?;
        self.refresh_comments()?;
        Ok(Some(outcome))
    }

    pub fn set_sort_mode(&mut self, mode: CommentSortMode) -> Result<()> {
        let Some(id) = self.open_report_id() else {
            return Ok(());
        };
        self.engagement.set_sort_preference(&id, mode)?;
        if let PanelState::Open(details) = &mut self.state {
            details.sort_mode = mode;
        }
        self.refresh_comments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gateways::image::PassThroughImages,
        usecases::map_layers::build_markers,
    };
    use imap_entities::builders::*;

    #[derive(Debug, Default)]
    struct MockMap {
        zoom: ZoomLevel,
        flights: Vec<(MapPoint, ZoomLevel)>,
    }

    impl MapHandle for MockMap {
        fn zoom(&self) -> ZoomLevel {
            self.zoom
        }
        fn fly_to(&mut self, center: MapPoint, zoom: ZoomLevel) {
            self.zoom = zoom;
            self.flights.push((center, zoom));
        }
    }

    fn markers() -> Vec<Marker> {
        let reports = vec![
            Report::build().id("a").lat_lng(23.50, 121.00).finish(),
            Report::build().id("b").lat_lng(23.51, 121.00).finish(),
            Report::build().id("c").lat_lng(23.60, 121.10).finish(),
        ];
        build_markers(&reports, &PassThroughImages)
    }

    fn new_panel(zoom: ZoomLevel) -> Panel<MockMap, InMemoryEngagementStorage> {
        Panel::new(
            MockMap {
                zoom,
                ..Default::default()
            },
            EngagementStore::new(InMemoryEngagementStorage::default()),
            markers(),
        )
    }

    #[test]
    fn open_and_close() {
        let mut panel = new_panel(8);
        assert!(!panel.is_open());
        assert!(panel.open_by_id(&"a".into(), false).unwrap());
        let details = panel.details().unwrap();
        assert_eq!(details.marker.id.as_str(), "a");
        let nearby: Vec<_> = details.nearby.iter().map(|n| n.marker.id.as_str()).collect();
        assert_eq!(nearby, vec!["b", "c"]);
        assert!(details.comments.is_empty());
        assert_eq!(details.sort_mode, CommentSortMode::TimeDesc);
        assert!(panel.map().flights.is_empty());
        panel.close();
        assert_eq!(panel.state(), &PanelState::Closed);
    }

    #[test]
    fn open_unknown_id_is_a_no_op() {
        let mut panel = new_panel(8);
        assert!(!panel.open_by_id(&"x".into(), true).unwrap());
        assert!(!panel.is_open());
        assert!(panel.map().flights.is_empty());
    }

    #[test]
    fn fly_to_enforces_a_minimum_zoom() {
        let mut panel = new_panel(8);
        panel.open_by_id(&"c".into(), true).unwrap();
        assert_eq!(
            panel.map().flights,
            vec![(MapPoint::from_lat_lng_deg(23.60, 121.10), FLY_TO_MIN_ZOOM)]
        );

        let mut panel = new_panel(17);
        panel.open_by_id(&"c".into(), true).unwrap();
        assert_eq!(panel.map().flights[0].1, 17);
    }

    #[test]
    fn engagement_survives_closing() {
        let mut panel = new_panel(15);
        panel.open_by_id(&"a".into(), false).unwrap();
        let comment = panel
            .submit_comment(Some("Bob"), "water rising")
            .unwrap()
            .unwrap();
        assert_eq!(panel.details().unwrap().comments.len(), 1);
        assert_eq!(
            panel.like_comment(comment.id).unwrap(),
            Some(LikeOutcome::Liked { likes: 1 })
        );
        panel.set_sort_mode(CommentSortMode::LikesDesc).unwrap();
        panel.close();
        assert_eq!(panel.submit_comment(None, "closed").unwrap(), None);

        panel.open_by_id(&"a".into(), false).unwrap();
        let details = panel.details().unwrap();
        assert_eq!(details.sort_mode, CommentSortMode::LikesDesc);
        assert_eq!(details.comments.len(), 1);
        assert!(details.comments[0].liked);
        assert_eq!(details.comments[0].comment.likes, 1);
    }

    #[test]
    fn tab_selection_is_independent() {
        let mut panel = new_panel(15);
        panel.select_tab(PanelTab::Comments);
        panel.open_by_id(&"b".into(), false).unwrap();
        assert_eq!(panel.tab(), PanelTab::Comments);
        panel.close();
        assert_eq!(panel.tab(), PanelTab::Comments);
        panel.select_tab(PanelTab::Nearby);
        assert_eq!(panel.tab(), PanelTab::Nearby);
    }
}
