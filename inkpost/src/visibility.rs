use diesel::pg::Pg;
use diesel::query_builder::BoxedSelectStatement;
use diesel::sql_types::Bool;
use diesel::BoxableExpression;

use crate::models::Moderation;
use crate::schema::comments;

/// A filter limiting which comments a query may return.
///
/// Comment reads always go through one of these so the moderation check
/// happens in the query itself, not after the rows have been loaded.
pub struct CommentFilter(Box<dyn BoxableExpression<comments::table, Pg, SqlType = Bool>>);

impl CommentFilter {
    /// Comments that readers are allowed to see.
    pub fn readers() -> Self {
        CommentFilter::moderation(Moderation::Approved)
    }

    /// Comments in exactly the given moderation state.
    pub fn moderation(status: Moderation) -> Self {
        use diesel::prelude::*;

        let approved = status == Moderation::Approved;
        CommentFilter(Box::new(comments::approved.eq(approved)))
    }

    pub fn apply<'a, ST>(
        self,
        query: BoxedSelectStatement<'a, ST, comments::table, Pg>,
    ) -> BoxedSelectStatement<'a, ST, comments::table, Pg> {
        use diesel::prelude::*;

        query.filter(self.0)
    }
}
