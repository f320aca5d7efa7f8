//! HTML templates for web interface
//!
//! Simple inline HTML templates without a template engine.

use chrono::{DateTime, Utc};
use filedesk::{
    files::FileMeta,
    user::{Identity, UserSummary},
};

/// Common CSS styles for all pages
const COMMON_STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
        max-width: 1000px;
        margin: 40px auto;
        padding: 0 20px;
        background: #f5f5f5;
    }
    .container {
        background: white;
        padding: 30px;
        border-radius: 8px;
        box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    }
    h1 {
        color: #333;
        border-bottom: 2px solid #0066cc;
        padding-bottom: 10px;
    }
    h2 {
        color: #555;
        margin-top: 30px;
    }
    nav a {
        color: #0066cc;
        text-decoration: none;
        margin-right: 15px;
    }
    .info-row {
        margin: 10px 0;
        padding: 8px;
        background: #f9f9f9;
        border-radius: 4px;
    }
    .label {
        font-weight: bold;
        color: #666;
        display: inline-block;
        width: 150px;
    }
    .value {
        color: #0066cc;
    }
    form {
        margin: 20px 0;
    }
    .form-group {
        margin: 15px 0;
    }
    label {
        display: block;
        font-weight: bold;
        margin-bottom: 5px;
        color: #333;
    }
    input[type="text"],
    input[type="email"],
    input[type="password"],
    select {
        width: 100%;
        padding: 10px;
        border: 1px solid #ddd;
        border-radius: 4px;
        font-size: 14px;
        box-sizing: border-box;
    }
    button {
        background: #0066cc;
        color: white;
        padding: 10px 20px;
        border: none;
        border-radius: 4px;
        cursor: pointer;
        font-size: 14px;
        font-weight: bold;
    }
    button:hover {
        background: #0052a3;
    }
    .danger {
        background: #d9534f;
    }
    .danger:hover {
        background: #c9302c;
    }
    .logout-btn {
        background: #999;
        float: right;
    }
    .logout-btn:hover {
        background: #777;
    }
    table {
        width: 100%;
        border-collapse: collapse;
        margin: 20px 0;
    }
    th, td {
        text-align: left;
        padding: 12px;
        border-bottom: 1px solid #ddd;
    }
    th {
        background: #f0f0f0;
        font-weight: bold;
        color: #333;
    }
    tr:hover {
        background: #f9f9f9;
    }
    .error {
        color: #d9534f;
        background: #f2dede;
        padding: 10px;
        border-radius: 4px;
        margin: 10px 0;
    }
    .code {
        font-family: monospace;
        background: #f5f5f5;
        padding: 2px 6px;
        border-radius: 3px;
        font-size: 13px;
    }
"#;

/// Wrap page content in the shared document shell
fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>filedesk - {}</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        html_escape(title)
    )
}

fn error_html(error: Option<&str>) -> String {
    error.map_or(String::new(), |e| {
        format!(r#"<div class="error">{}</div>"#, html_escape(e))
    })
}

fn logout_button() -> &'static str {
    r#"<form method="POST" action="/logout" style="display: inline;">
                <button type="submit" class="logout-btn">Logout</button>
            </form>"#
}

/// Render the login page
pub fn login_page(error: Option<&str>) -> String {
    let error_html = error_html(error);
    page(
        "Login",
        &format!(
            r#"        <h1>filedesk</h1>
        <h2>Login</h2>
        {error_html}
        <form method="POST" action="/login">
            <div class="form-group">
                <label for="email">Email:</label>
                <input type="email" id="email" name="email" required autofocus>
            </div>
            <div class="form-group">
                <label for="password">Password:</label>
                <input type="password" id="password" name="password" required>
            </div>
            <button type="submit">Login</button>
        </form>
        <p style="margin-top: 20px; text-align: center;">
            Don't have an account? <a href="/register">Register here</a>
        </p>"#
        ),
    )
}

/// Render the registration page
pub fn register_page(error: Option<&str>) -> String {
    let error_html = error_html(error);
    page(
        "Register",
        &format!(
            r#"        <h1>filedesk</h1>
        <h2>Register New Account</h2>
        {error_html}
        <form method="POST" action="/register">
            <div class="form-group">
                <label for="email">Email:</label>
                <input type="email" id="email" name="email" required autofocus>
            </div>
            <div class="form-group">
                <label for="password">Password:</label>
                <input type="password" id="password" name="password" required>
            </div>
            <div class="form-group">
                <label for="confirmPassword">Confirm Password:</label>
                <input type="password" id="confirmPassword" name="confirmPassword" required>
            </div>
            <div class="form-group">
                <label><input type="checkbox" name="isAdmin" value="on"> Administrator account</label>
            </div>
            <button type="submit">Create Account</button>
        </form>
        <p style="margin-top: 20px; text-align: center;">
            Already have an account? <a href="/login">Login here</a>
        </p>"#
        ),
    )
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

/// Render the user dashboard with the user's files, newest first
pub fn user_dashboard_page(identity: &Identity, files: &[FileMeta]) -> String {
    let files_html = if files.is_empty() {
        r#"<p style="color: #666; font-style: italic;">No files uploaded yet.</p>"#.to_string()
    } else {
        let rows: String = files
            .iter()
            .map(|file| {
                let id = html_escape(&file.file_id.to_string());
                format!(
                    r#"<tr>
                    <td>{}</td>
                    <td>{}</td>
                    <td>{}</td>
                    <td>{} bytes</td>
                    <td>{}</td>
                    <td>
                        <a href="/download/{id}">Download</a>
                        <a href="/user/edit/{id}">Rename</a>
                        <a href="/user/delete/{id}">Delete</a>
                    </td>
                </tr>"#,
                    file.sequential_id,
                    html_escape(&file.original_name),
                    html_escape(&file.mimetype),
                    file.size,
                    format_date(&file.upload_date),
                )
            })
            .collect();

        format!(
            r#"<table>
            <tr>
                <th>#</th>
                <th>Name</th>
                <th>Type</th>
                <th>Size</th>
                <th>Uploaded</th>
                <th>Actions</th>
            </tr>
            {rows}
        </table>"#
        )
    };

    page(
        "Dashboard",
        &format!(
            r#"        <h1>My Files
            {}
        </h1>
        <div class="info-row">
            <span class="label">Signed in as:</span>
            <span class="value">{}</span>
        </div>
        <nav><a href="/user/create">Upload a file</a></nav>
        <h2>Files</h2>
        {files_html}"#,
            logout_button(),
            html_escape(&identity.email),
        ),
    )
}

/// Render the upload form
pub fn create_file_page(max_upload: usize) -> String {
    page(
        "Upload",
        &format!(
            r#"        <h1><a href="/user/dashboard" style="color: #0066cc; text-decoration: none;">&larr; Dashboard</a></h1>
        <h2>Upload a File</h2>
        <form method="POST" action="/upload" enctype="multipart/form-data">
            <div class="form-group">
                <label for="file">File:</label>
                <input type="file" id="file" name="file" required>
                <small style="color: #666;">Maximum size {} MiB</small>
            </div>
            <button type="submit">Upload</button>
        </form>"#,
            max_upload / (1024 * 1024)
        ),
    )
}

/// Render the rename form for a file
pub fn edit_file_page(file: &FileMeta) -> String {
    let id = html_escape(&file.file_id.to_string());
    let name = html_escape(&file.original_name);
    page(
        "Rename",
        &format!(
            r#"        <h1><a href="/user/dashboard" style="color: #0066cc; text-decoration: none;">&larr; Dashboard</a></h1>
        <h2>Rename <span class="code">{name}</span></h2>
        <form method="POST" action="/files/rename">
            <input type="hidden" name="fileId" value="{id}">
            <div class="form-group">
                <label for="newFileName">New name:</label>
                <input type="text" id="newFileName" name="newFileName" value="{name}" required autofocus>
            </div>
            <button type="submit">Rename</button>
        </form>"#
        ),
    )
}

/// Render the delete confirmation for a file
pub fn delete_file_page(file: &FileMeta) -> String {
    let id = html_escape(&file.file_id.to_string());
    page(
        "Delete",
        &format!(
            r#"        <h1><a href="/user/dashboard" style="color: #0066cc; text-decoration: none;">&larr; Dashboard</a></h1>
        <h2>Delete File</h2>
        <div class="info-row">
            <span class="label">Name:</span>
            <span class="value">{}</span>
        </div>
        <div class="info-row">
            <span class="label">Size:</span>
            <span class="value">{} bytes</span>
        </div>
        <form method="POST" action="/files/{id}/delete">
            <button type="submit" class="danger">Delete permanently</button>
        </form>"#,
            html_escape(&file.original_name),
            file.size,
        ),
    )
}

/// Render the admin dashboard with store totals
pub fn admin_dashboard_page(identity: &Identity, users: u64, files: u64) -> String {
    page(
        "Admin",
        &format!(
            r#"        <h1>Admin Dashboard
            {}
        </h1>
        <div class="info-row">
            <span class="label">Signed in as:</span>
            <span class="value">{}</span>
        </div>
        <nav>
            <a href="/admin/record">User records</a>
            <a href="/admin/createuser">Create user</a>
        </nav>
        <h2>Statistics</h2>
        <div class="info-row">
            <span class="label">Users:</span>
            <span class="value">{users}</span>
        </div>
        <div class="info-row">
            <span class="label">Files:</span>
            <span class="value">{files}</span>
        </div>"#,
            logout_button(),
            html_escape(&identity.email),
        ),
    )
}

/// Render the user table, ascending by user id
pub fn admin_record_page(users: &[UserSummary]) -> String {
    let rows: String = users
        .iter()
        .map(|user| {
            format!(
                r#"<tr>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>
                    <form method="POST" action="/admin/users/{}/delete" style="margin: 0;">
                        <button type="submit" class="danger">Delete</button>
                    </form>
                </td>
            </tr>"#,
                user.user_id,
                html_escape(&user.email),
                user.role,
                user.file_count,
                user.id,
            )
        })
        .collect();

    page(
        "User Records",
        &format!(
            r#"        <h1><a href="/admin/dashboard" style="color: #0066cc; text-decoration: none;">&larr; Admin</a></h1>
        <h2>User Records</h2>
        <table>
            <tr>
                <th>User ID</th>
                <th>Email</th>
                <th>Role</th>
                <th>Files</th>
                <th>Actions</th>
            </tr>
            {rows}
        </table>"#
        ),
    )
}

/// Render the admin create-user form
pub fn admin_create_user_page(error: Option<&str>) -> String {
    let error_html = error_html(error);
    page(
        "Create User",
        &format!(
            r#"        <h1><a href="/admin/dashboard" style="color: #0066cc; text-decoration: none;">&larr; Admin</a></h1>
        <h2>Create User</h2>
        {error_html}
        <form method="POST" action="/admin/createuser">
            <div class="form-group">
                <label for="email">Email:</label>
                <input type="email" id="email" name="email" required autofocus>
            </div>
            <div class="form-group">
                <label for="password">Password:</label>
                <input type="password" id="password" name="password" required>
            </div>
            <div class="form-group">
                <label for="role">Role:</label>
                <select id="role" name="role">
                    <option value="user" selected>User</option>
                    <option value="admin">Admin</option>
                </select>
            </div>
            <button type="submit">Create</button>
        </form>"#
        ),
    )
}

/// Render an error page
pub fn error_page(status: u16, message: &str) -> String {
    page(
        "Error",
        &format!(
            r#"        <h1>Error {status}</h1>
        <div class="error">{}</div>
        <p><a href="/">Back</a></p>"#,
            html_escape(message)
        ),
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
