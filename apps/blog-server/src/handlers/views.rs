//! Domain to response mapping.

use blog_core::Page;
use blog_core::domain::{Author, Category, CommentDetails, Location, PostDetails, User};
use blog_shared::dto::{
    AuthorResponse, CategoryResponse, CommentResponse, LocationResponse, PageResponse,
    PostResponse, ProfileResponse, UserResponse,
};

pub fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
    }
}

pub fn post(details: PostDetails) -> PostResponse {
    let PostDetails {
        post,
        author: post_author,
        category: post_category,
        location: post_location,
        comment_count,
    } = details;

    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        is_published: post.is_published,
        created_at: post.created_at,
        author: author(post_author),
        category: post_category.map(category),
        location: post_location.map(location),
        image: post.image,
        comment_count,
    }
}

pub fn comment(details: CommentDetails) -> CommentResponse {
    CommentResponse {
        id: details.comment.id,
        post_id: details.comment.post_id,
        text: details.comment.text,
        author: author(details.author),
        created_at: details.comment.created_at,
    }
}

pub fn posts(page: Page<PostDetails>) -> PageResponse<PostResponse> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(post);

    PageResponse {
        items: page.items,
        page: page.number,
        per_page: page.per_page,
        total: page.total,
        num_pages: page.num_pages,
        has_next,
        has_previous,
    }
}

pub fn profile(user: User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        date_joined: user.created_at,
    }
}

pub fn account(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        created_at: user.created_at,
    }
}
