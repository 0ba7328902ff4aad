//! Dashboard state for a signed-in owner.
//!
//! Every mutation runs the remote call first and only touches local state
//! when it succeeds, so a failed request leaves the view exactly as the
//! server last confirmed it.

use std::future::Future;

use tracing::warn;
use uuid::Uuid;

use wall_types::models::{Testimonial, Wall, WallSettings};

use crate::client::WallClient;
use crate::error::ClientError;

#[derive(Debug, Default, Clone)]
pub struct ModerationView {
    walls: Vec<Wall>,
    testimonials: Vec<Testimonial>,
}

impl ModerationView {
    pub fn new(walls: Vec<Wall>, testimonials: Vec<Testimonial>) -> Self {
        Self { walls, testimonials }
    }

    /// Fetch every wall of the signed-in owner and all their testimonials.
    pub async fn load(client: &WallClient) -> Result<Self, ClientError> {
        let walls = client.list_walls().await?;
        let mut testimonials = Vec::new();
        for wall in &walls {
            testimonials.extend(client.list_testimonials(wall.id).await?);
        }
        Ok(Self { walls, testimonials })
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn testimonials(&self, wall_id: Uuid) -> impl Iterator<Item = &Testimonial> {
        self.testimonials.iter().filter(move |t| t.wall_id == wall_id)
    }

    pub fn testimonial(&self, id: Uuid) -> Option<&Testimonial> {
        self.testimonials.iter().find(|t| t.id == id)
    }

    pub fn pending_count(&self, wall_id: Uuid) -> usize {
        self.testimonials(wall_id).filter(|t| !t.is_approved).count()
    }

    pub fn wall(&self, id: Uuid) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    /// Create a wall through `op` and list it first, as the server orders
    /// walls newest first.
    pub async fn create_wall<F, Fut, E>(&mut self, op: F) -> Result<Uuid, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Wall, E>>,
    {
        let wall = op().await?;
        let id = wall.id;
        self.walls.retain(|w| w.id != id);
        self.walls.insert(0, wall);
        Ok(id)
    }

    /// Save styling through `op`, then adopt the wall it returns.
    pub async fn update_settings<F, Fut, E>(
        &mut self,
        wall_id: Uuid,
        settings: WallSettings,
        op: F,
    ) -> Result<(), E>
    where
        F: FnOnce(Uuid, WallSettings) -> Fut,
        Fut: Future<Output = Result<Wall, E>>,
    {
        let updated = op(wall_id, settings).await?;
        match self.walls.iter_mut().find(|w| w.id == updated.id) {
            Some(slot) => *slot = updated,
            None => {
                warn!("Server returned unknown wall {}", updated.id);
                self.walls.insert(0, updated);
            }
        }
        Ok(())
    }

    /// Toggle approval through `op`, then adopt the record it returns.
    pub async fn toggle<F, Fut, E>(&mut self, id: Uuid, op: F) -> Result<(), E>
    where
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = Result<Testimonial, E>>,
    {
        let updated = op(id).await?;
        match self.testimonials.iter_mut().find(|t| t.id == updated.id) {
            Some(slot) => *slot = updated,
            None => {
                warn!("Server returned unknown testimonial {}", updated.id);
                self.testimonials.push(updated);
            }
        }
        Ok(())
    }

    pub async fn delete_testimonial<F, Fut, E>(&mut self, id: Uuid, op: F) -> Result<(), E>
    where
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        op(id).await?;
        self.testimonials.retain(|t| t.id != id);
        Ok(())
    }

    /// Delete a wall; its testimonials go with it.
    pub async fn delete_wall<F, Fut, E>(&mut self, wall_id: Uuid, op: F) -> Result<(), E>
    where
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        op(wall_id).await?;
        self.walls.retain(|w| w.id != wall_id);
        self.testimonials.retain(|t| t.wall_id != wall_id);
        Ok(())
    }
}
