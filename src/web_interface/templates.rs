//! HTML pages served by the web interface.
//!
//! Every page shares the same header and footer; user content is always
//! passed through [`html_escape`].

use crate::model::Post;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Simple HTML escape for user-generated content
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <link rel="stylesheet" href="/assets/css/style.css">
</head>
<body>
  <header>
    <nav><a href="/">Posts</a> <a href="/write">New post</a></nav>
  </header>
  <main>
{body}
  </main>
  <footer><p>scribe</p></footer>
</body>
</html>
"#,
        title = html_escape(title),
        body = body
    )
}

fn post_entry(post: &Post) -> String {
    format!(
        r#"    <article class="post">
      <h2>{title}</h2>
      <time>{time}</time>
      <p>{text}</p>
      <a href="/edit?id={id}">Edit</a>
      <form method="post" action="/delete">
        <input type="hidden" name="id" value="{id}">
        <button type="submit">Delete</button>
      </form>
    </article>
"#,
        title = html_escape(&post.title),
        time = post.time.format(TIME_FORMAT),
        text = html_escape(&post.text).replace('\n', "<br>"),
        id = post.id
    )
}

/// The index page listing `posts` in the given order.
pub fn index_page(posts: &[Post]) -> String {
    let body = if posts.is_empty() {
        String::from(r#"    <p class="empty">No posts yet.</p>"#)
    } else {
        posts.iter().map(post_entry).collect()
    };
    layout("Posts", &body)
}

/// The write form, pre-filled when editing an existing post.
pub fn write_page(post: Option<&Post>) -> String {
    let (heading, id, title, text) = match post {
        Some(p) => (
            "Edit post",
            p.id.to_string(),
            html_escape(&p.title),
            html_escape(&p.text),
        ),
        None => ("New post", String::new(), String::new(), String::new()),
    };
    let body = format!(
        r#"    <h1>{heading}</h1>
    <form method="post" action="/save">
      <input type="hidden" name="id" value="{id}">
      <label>Title <input type="text" name="title" value="{title}"></label>
      <label>Text <textarea name="text" rows="12">{text}</textarea></label>
      <button type="submit">Save</button>
    </form>
"#
    );
    layout(heading, &body)
}

/// A generic error page; `message` must not leak internal details.
pub fn error_page(status: u16, message: &str) -> String {
    let body = format!(
        r#"    <h1>{status}</h1>
    <p>{message}</p>
    <p><a href="/">Back to posts</a></p>
"#,
        status = status,
        message = html_escape(message)
    );
    layout(message, &body)
}
