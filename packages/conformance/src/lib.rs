//! Shared fixtures for the jsonapi-weld conformance test suite.
//!
//! Provides a small blog domain — [`Account`], [`Post`], [`Comment`] — with
//! explicitly modelled relation loading: every relation is an `Option`, where
//! `None` means "not eagerly loaded" and `Some` means loaded (possibly
//! empty). This mirrors how an ORM hands over a record with whatever
//! relations the query eager-loaded, which is exactly the distinction the
//! serializer's omission rules depend on.
//!
//! The three mappings deliberately use both construction modes: `Post`
//! registers declaratively ([`Resource::register`]), while `Account` and
//! `Comment` use the method-based accessors, with `Account` additionally
//! relying on the type-name-derived kind (`Account` → `"accounts"`).

use jsonapi_weld::{Descriptor, Object, Relation, Resource};
use serde_json::json;

/// A user account. Kind is derived from the type name: `"accounts"`.
pub struct Account {
    pub identifier: String,
    pub name: String,
    /// `None` = the posts relation was not eager-loaded.
    pub posts: Option<Vec<Post>>,
}

impl Account {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            posts: None,
        }
    }

    /// Eager-load the posts relation.
    pub fn with_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = Some(posts);
        self
    }
}

impl Resource for Account {
    fn identifier(&self) -> Option<String> {
        Some(self.identifier.clone())
    }

    fn attributes(&self) -> Object {
        let mut attrs = Object::new();
        attrs.insert("name".into(), json!(self.name));
        attrs
    }

    fn relationships(&self) -> Vec<Relation<'_>> {
        match &self.posts {
            Some(posts) => vec![Relation::many(
                "posts",
                posts.iter().map(|p| p as &dyn Resource).collect(),
            )],
            None => vec![Relation::unloaded("posts")],
        }
    }

    fn meta(&self) -> Object {
        let mut meta = Object::new();
        // Prolific authors are flagged, but only when their posts are loaded.
        if self.posts.as_ref().is_some_and(|p| p.len() >= 10) {
            meta.insert("experienced_author".into(), json!(true));
        }
        meta
    }
}

/// A blog post, mapped declaratively via `register`.
pub struct Post {
    pub identifier: String,
    pub title: String,
    /// `None` = the author relation was not eager-loaded.
    pub author: Option<Box<Account>>,
    /// `None` = the comments relation was not eager-loaded.
    pub comments: Option<Vec<Comment>>,
}

impl Post {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            author: None,
            comments: None,
        }
    }

    pub fn with_author(mut self, author: Account) -> Self {
        self.author = Some(Box::new(author));
        self
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = Some(comments);
        self
    }
}

impl Resource for Post {
    fn register(&self) -> Option<Descriptor<'_>> {
        let mut descriptor = Descriptor::new()
            .id(self.identifier.clone())
            .kind("posts")
            .attribute("title", self.title.clone())
            .link("self", format!("/posts/{}", self.identifier));

        descriptor = match &self.author {
            Some(author) => descriptor.relation(Relation::one("author", author.as_ref())),
            None => descriptor.relation(Relation::unloaded("author")),
        };
        descriptor = match &self.comments {
            Some(comments) => descriptor.relation(Relation::many(
                "comments",
                comments.iter().map(|c| c as &dyn Resource).collect(),
            )),
            None => descriptor.relation(Relation::unloaded("comments")),
        };

        Some(descriptor)
    }
}

/// A comment on a post.
pub struct Comment {
    pub identifier: String,
    pub message: String,
    /// `None` = the commenter relation was not eager-loaded.
    pub commenter: Option<Box<Account>>,
}

impl Comment {
    pub fn new(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            message: message.into(),
            commenter: None,
        }
    }

    pub fn with_commenter(mut self, commenter: Account) -> Self {
        self.commenter = Some(Box::new(commenter));
        self
    }
}

impl Resource for Comment {
    fn identifier(&self) -> Option<String> {
        Some(self.identifier.clone())
    }

    fn attributes(&self) -> Object {
        let mut attrs = Object::new();
        attrs.insert("message".into(), json!(self.message));
        attrs
    }

    fn relationships(&self) -> Vec<Relation<'_>> {
        match &self.commenter {
            Some(commenter) => vec![Relation::one("commenter", commenter.as_ref())],
            None => vec![Relation::unloaded("commenter")],
        }
    }
}
