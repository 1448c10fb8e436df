//! Built-in page templates. Each can be replaced by a file of the same name in the
//! configured template directory.

pub const HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{#if title}}{{title}} - {{/if}}quill</title>
</head>
<body>
  <div class="nav">
    <a class="brand" href="/">quill</a>
    {{#if user}}
      <span class="user">{{user}}</span>
      <a href="/newpost">new post</a>
      <a href="/logout">logout</a>
    {{else}}
      <a href="/login">login</a>
      <a href="/signup">signup</a>
    {{/if}}
  </div>
  <div class="content">
"#;

pub const FOOTER: &str = r#"  </div>
</body>
</html>
"#;

pub const POST: &str = r#"<div class="post">
  <div class="post-heading">
    <a class="post-title" href="/post/{{id}}">{{subject}}</a>
    <span class="post-date">{{created}}</span>
  </div>
  {{#if author}}<div class="post-author">by {{author}}</div>{{/if}}
  <div class="post-content">{{{html_content}}}</div>
  {{#if can_edit}}<div class="post-actions"><a href="/post/{{id}}/edit">edit</a></div>{{/if}}
</div>
"#;

pub const BLOG: &str = r#"{{> header}}
<h1>Recent posts</h1>
{{#each posts}}
  {{> post}}
{{else}}
  <p class="empty">No posts yet.</p>
{{/each}}
{{> footer}}"#;

pub const PERMALINK: &str = r#"{{> header}}
{{#with post}}{{> post}}{{/with}}
<div class="post-meta">last modified {{post.modified}}</div>
<form method="post" action="/post/{{post.id}}/delete">
  <input type="submit" value="delete">
</form>
{{> footer}}"#;

pub const NEWPOST: &str = r#"{{> header}}
<h2>New post</h2>
<form method="post" action="/newpost">
  <label>subject <input type="text" name="subject" value="{{subject}}"></label>
  <label>content <textarea name="content">{{content}}</textarea></label>
  <div class="error">{{error}}</div>
  <input type="submit">
</form>
{{> footer}}"#;

pub const EDITPOST: &str = r#"{{> header}}
<h2>Edit post</h2>
<form method="post" action="/post/{{id}}/edit">
  <label>subject <input type="text" name="subject" value="{{subject}}"></label>
  <label>content <textarea name="content">{{content}}</textarea></label>
  <div class="error">{{error}}</div>
  <input type="submit">
</form>
{{> footer}}"#;

pub const SIGNUP: &str = r#"{{> header}}
<h2>Signup</h2>
<form method="post" action="/signup">
  <label>Username <input type="text" name="username" value="{{username}}"></label>
  <span class="error">{{errors.username}}</span>
  <label>Password <input type="password" name="password"></label>
  <span class="error">{{errors.password}}</span>
  <label>Verify Password <input type="password" name="verify"></label>
  <span class="error">{{errors.verify}}</span>
  <label>Email (optional) <input type="text" name="email" value="{{email}}"></label>
  <span class="error">{{errors.email}}</span>
  <input type="submit">
</form>
{{> footer}}"#;

pub const LOGIN: &str = r#"{{> header}}
<h2>Login</h2>
<form method="post" action="/login">
  <label>Username <input type="text" name="username" value="{{username}}"></label>
  <label>Password <input type="password" name="password"></label>
  <div class="error">{{error}}</div>
  <input type="submit">
</form>
{{> footer}}"#;

pub const WELCOME: &str = r#"{{> header}}
<h2>Welcome, {{user}}!</h2>
{{> footer}}"#;

pub const MESSAGE: &str = r#"{{> header}}
<h2>{{heading}}</h2>
<p class="message">{{message}}</p>
{{> footer}}"#;

/// (name, source) for every built-in. Partials are registered like any template.
pub const BUILTIN: &[(&str, &str)] = &[
    ("header", HEADER),
    ("footer", FOOTER),
    ("post", POST),
    ("post.html", POST),
    ("blog.html", BLOG),
    ("permalink.html", PERMALINK),
    ("newpost.html", NEWPOST),
    ("editpost.html", EDITPOST),
    ("signup.html", SIGNUP),
    ("login.html", LOGIN),
    ("welcome.html", WELCOME),
    ("message.html", MESSAGE),
];
