//! Minimal server-side HTML for the list and create pages.

use std::fmt::Write as _;

use crate::cluster::RawClusterInput;
use crate::store::ClusterRow;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn index_page(clusters: &[ClusterRow], notice: Option<&str>) -> String {
    let mut body = String::from("<h1>Clusters</h1>\n");
    if let Some(notice) = notice {
        let _ = writeln!(body, "<p class=\"notice\">{}</p>", escape(notice));
    }
    body.push_str("<p><a href=\"/cluster/new\">New cluster</a></p>\n");

    if clusters.is_empty() {
        body.push_str("<p>No clusters defined yet.</p>\n");
        return page("Clusters", &body);
    }

    body.push_str(
        "<table>\n<tr><th>Name</th><th>Control plane</th><th>Workers</th><th>Kubernetes</th><th>CNI</th><th></th></tr>\n",
    );
    for c in clusters {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/deploy/{id}\">deploy</a> <a href=\"/destroy/{id}\">destroy</a></td></tr>",
            escape(&c.name),
            escape(&c.control_plane),
            escape(&c.workers),
            escape(&c.k8s_version),
            escape(&c.cni_plugin),
            id = c.id,
        );
    }
    body.push_str("</table>\n");

    page("Clusters", &body)
}

pub fn form_page(data: &RawClusterInput, error: Option<&str>) -> String {
    let mut body = String::from("<h1>New cluster</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(body, "<div class=\"error\">{}</div>", escape(error));
    }

    body.push_str("<form method=\"post\" action=\"/cluster/new\">\n");
    let fields: [(&str, &str, &Option<String>); 7] = [
        ("name", "Name", &data.name),
        ("control_plane", "Control plane IPs (comma separated)", &data.control_plane),
        ("workers", "Worker IPs (comma separated)", &data.workers),
        ("ssh_user", "SSH user", &data.ssh_user),
        ("private_key_path", "Private key path", &data.private_key_path),
        ("k8s_version", "Kubernetes version", &data.k8s_version),
        ("cni_plugin", "CNI plugin", &data.cni_plugin),
    ];
    for (name, label, value) in fields {
        let _ = writeln!(
            body,
            "<label>{label} <input name=\"{name}\" value=\"{}\"></label><br>",
            escape(value.as_deref().unwrap_or(""))
        );
    }
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");

    page("New cluster", &body)
}
