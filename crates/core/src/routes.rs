//! Console route table
//!
//! Maps URL paths to a view template and the controller that drives it.
//! The table is fixed at startup; anything it does not know is sent to the
//! fallback page instead of raising an error.

use crate::config::RouteConfig;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// One registered route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    /// Path pattern, `:name` segments capture a parameter
    pub path: &'static str,
    pub template: &'static str,
    pub controller: &'static str,
    pub requires_auth: bool,
}

impl RouteEntry {
    pub const fn public(path: &'static str, template: &'static str, controller: &'static str) -> Self {
        Self {
            path,
            template,
            controller,
            requires_auth: false,
        }
    }

    pub const fn protected(
        path: &'static str,
        template: &'static str,
        controller: &'static str,
    ) -> Self {
        Self {
            path,
            template,
            controller,
            requires_auth: true,
        }
    }

    fn matches(&self, segments: &[&str]) -> Option<BTreeMap<String, String>> {
        let pattern: Vec<&str> = split_segments(self.path).collect();
        if pattern.len() != segments.len() {
            return None;
        }
        let mut params = BTreeMap::new();
        for (expected, actual) in pattern.iter().zip(segments) {
            if let Some(name) = expected.strip_prefix(':') {
                if actual.is_empty() {
                    return None;
                }
                let value = urlencoding::decode(actual)
                    .map_or_else(|_| (*actual).to_string(), |v| v.into_owned());
                params.insert(name.to_string(), value);
            } else if expected != actual {
                return None;
            }
        }
        Some(params)
    }
}

/// A resolved route together with its captured parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// What the router should do with a requested path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<'a> {
    Render(RouteMatch<'a>),
    Redirect(String),
}

/// Immutable table of routes plus the fallback/home targets
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    config: RouteConfig,
}

impl RouteTable {
    /// Build a table, checking that the well-known targets are registered
    pub fn new(entries: Vec<RouteEntry>, config: RouteConfig) -> Result<Self> {
        let table = Self { entries, config };
        for target in [
            &table.config.fallback_path,
            &table.config.login_path,
            &table.config.home_path,
        ] {
            if table.find(target).is_none() {
                return Err(Error::config(format!("route {target:?} is not registered")));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for entry in &table.entries {
            if !seen.insert(entry.path) {
                return Err(Error::config(format!("route {:?} registered twice", entry.path)));
            }
        }
        Ok(table)
    }

    /// The stock console table
    pub fn standard(config: RouteConfig) -> Result<Self> {
        Self::new(ROUTES.to_vec(), config)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Decide what to show for `path`; unknown paths redirect to the fallback
    pub fn navigate(&self, path: &str) -> Navigation<'_> {
        let path = strip_query(path);
        if path.trim_matches('/').is_empty() {
            return Navigation::Redirect(self.config.home_path.clone());
        }
        match self.find(path) {
            Some(found) => Navigation::Render(found),
            None => {
                tracing::debug!(path, fallback = %self.config.fallback_path, "no route matched");
                Navigation::Redirect(self.config.fallback_path.clone())
            }
        }
    }

    /// Resolve `path` to the entry that ends up rendered, following redirects
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        match self.navigate(path) {
            Navigation::Render(found) => found,
            Navigation::Redirect(target) => self
                .find(&target)
                .or_else(|| self.find(&self.config.fallback_path))
                .unwrap_or_else(|| RouteMatch {
                    entry: &FALLBACK_ENTRY,
                    params: BTreeMap::new(),
                }),
        }
    }

    fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        let segments: Vec<&str> = split_segments(strip_query(path)).collect();
        self.entries.iter().find_map(|entry| {
            entry
                .matches(&segments)
                .map(|params| RouteMatch { entry, params })
        })
    }
}

// Used only when the configured fallback is missing, which `new` rejects.
const FALLBACK_ENTRY: RouteEntry = RouteEntry::public("/sorry", "partials/sorry.html", "SorryCtrl");

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Every page of the stock console
pub const ROUTES: &[RouteEntry] = &[
    RouteEntry::public("/login", "partials/login.html", "LoginCtrl"),
    RouteEntry::public("/logout", "partials/logout.html", "LogoutCtrl"),
    RouteEntry::public("/sorry", "partials/sorry.html", "SorryCtrl"),
    RouteEntry::protected("/main", "partials/main.html", "MainCtrl"),
    RouteEntry::protected("/setting", "partials/setting.html", "SettingCtrl"),
    RouteEntry::protected("/setting/:section", "partials/setting.html", "SettingCtrl"),
    // services
    RouteEntry::protected("/service", "partials/service.html", "ServiceCtrl"),
    RouteEntry::protected("/service/nginx", "partials/service/nginx.html", "ServiceNginxCtrl"),
    RouteEntry::protected("/service/apache", "partials/service/apache.html", "ServiceApacheCtrl"),
    RouteEntry::protected("/service/lighttpd", "partials/service/lighttpd.html", "ServiceLighttpdCtrl"),
    RouteEntry::protected("/service/tomcat", "partials/service/tomcat.html", "ServiceTomcatCtrl"),
    RouteEntry::protected("/service/vsftpd", "partials/service/vsftpd.html", "ServiceVsftpdCtrl"),
    RouteEntry::protected("/service/pureftpd", "partials/service/pureftpd.html", "ServicePureftpdCtrl"),
    RouteEntry::protected("/service/proftpd", "partials/service/proftpd.html", "ServiceProftpdCtrl"),
    RouteEntry::protected("/service/mysql", "partials/service/mysql.html", "ServiceMySQLCtrl"),
    RouteEntry::protected("/service/mariadb", "partials/service/mariadb.html", "ServiceMariaDBCtrl"),
    RouteEntry::protected("/service/redis", "partials/service/redis.html", "ServiceRedisCtrl"),
    RouteEntry::protected("/service/memcache", "partials/service/memcache.html", "ServiceMemcacheCtrl"),
    RouteEntry::protected("/service/mongodb", "partials/service/mongodb.html", "ServiceMongoDBCtrl"),
    RouteEntry::protected("/service/php", "partials/service/php.html", "ServicePHPCtrl"),
    RouteEntry::protected("/service/sendmail", "partials/service/sendmail.html", "ServiceSendmailCtrl"),
    RouteEntry::protected("/service/postfix", "partials/service/postfix.html", "ServicePostfixCtrl"),
    RouteEntry::protected("/service/ssh", "partials/service/ssh.html", "ServiceSSHCtrl"),
    RouteEntry::protected("/service/iptables", "partials/service/iptables.html", "ServiceIPTablesCtrl"),
    RouteEntry::protected("/service/cron", "partials/service/cron.html", "ServiceCronCtrl"),
    RouteEntry::protected("/service/ntp", "partials/service/ntp.html", "ServiceNTPCtrl"),
    RouteEntry::protected("/service/named", "partials/service/named.html", "ServiceNamedCtrl"),
    RouteEntry::protected("/service/docker", "partials/service/docker.html", "ServiceDockerCtrl"),
    RouteEntry::protected("/service/shadowsocks", "partials/service/shadowsocks.html", "ServiceShadowsocksCtrl"),
    // sites
    RouteEntry::protected("/site", "partials/site.html", "SiteCtrl"),
    RouteEntry::protected("/site/:server/new", "partials/site/edit.html", "SiteNewCtrl"),
    RouteEntry::protected("/site/:server/edit/:name", "partials/site/edit.html", "SiteEditCtrl"),
    RouteEntry::protected("/site/package", "partials/site/package.html", "SitePackageCtrl"),
    // databases
    RouteEntry::protected("/database", "partials/database.html", "DatabaseCtrl"),
    RouteEntry::protected("/database/mysql", "partials/database/mysql.html", "DatabaseMySQLCtrl"),
    RouteEntry::protected("/database/mysql/:dbname", "partials/database/mysql_db.html", "DatabaseMySQLDbCtrl"),
    RouteEntry::protected("/database/redis", "partials/database/redis.html", "DatabaseRedisCtrl"),
    RouteEntry::protected("/database/mongodb", "partials/database/mongodb.html", "DatabaseMongoDBCtrl"),
    // ftp
    RouteEntry::protected("/ftp", "partials/ftp.html", "FtpCtrl"),
    RouteEntry::protected("/ftp/:server", "partials/ftp/server.html", "FtpServerCtrl"),
    RouteEntry::protected("/ftp/:server/user/:name", "partials/ftp/user.html", "FtpUserCtrl"),
    // files
    RouteEntry::protected("/file", "partials/file.html", "FileCtrl"),
    RouteEntry::protected("/file/trash", "partials/file/trash.html", "FileTrashCtrl"),
    RouteEntry::protected("/file/edit", "partials/file/edit.html", "FileEditCtrl"),
    // utilities
    RouteEntry::protected("/utils", "partials/utils.html", "UtilsCtrl"),
    RouteEntry::protected("/utils/user", "partials/utils/user.html", "UtilsUserCtrl"),
    RouteEntry::protected("/utils/process", "partials/utils/process.html", "UtilsProcessCtrl"),
    RouteEntry::protected("/utils/network", "partials/utils/network.html", "UtilsNetworkCtrl"),
    RouteEntry::protected("/utils/time", "partials/utils/time.html", "UtilsTimeCtrl"),
    RouteEntry::protected("/utils/partition", "partials/utils/partition.html", "UtilsPartitionCtrl"),
    RouteEntry::protected("/utils/autofs", "partials/utils/autofs.html", "UtilsAutoFSCtrl"),
    RouteEntry::protected("/utils/cron", "partials/utils/cron.html", "UtilsCronCtrl"),
    RouteEntry::protected("/utils/shell", "partials/utils/shell.html", "UtilsShellCtrl"),
    RouteEntry::protected("/utils/ssl", "partials/utils/ssl.html", "UtilsSSLCtrl"),
    RouteEntry::protected("/utils/ssl/:section", "partials/utils/ssl.html", "UtilsSSLCtrl"),
    RouteEntry::protected("/utils/repository", "partials/utils/repository.html", "UtilsRepositoryCtrl"),
    RouteEntry::protected("/utils/repository/yum", "partials/utils/repository_yum.html", "UtilsRepoYumCtrl"),
    RouteEntry::protected("/utils/backup", "partials/utils/backup.html", "UtilsBackupCtrl"),
    RouteEntry::protected("/utils/remote", "partials/utils/remote.html", "UtilsRemoteCtrl"),
    // security
    RouteEntry::protected("/secure", "partials/secure.html", "SecureCtrl"),
    RouteEntry::protected("/secure/ssh", "partials/secure/ssh.html", "SecureSSHCtrl"),
    RouteEntry::protected("/secure/firewall", "partials/secure/firewall.html", "SecureFirewallCtrl"),
    // logs and tasks
    RouteEntry::protected("/log", "partials/log.html", "LogCtrl"),
    RouteEntry::protected("/log/:service", "partials/log/view.html", "LogViewCtrl"),
    RouteEntry::protected("/task", "partials/task.html", "TaskCtrl"),
    // software and plugins
    RouteEntry::protected("/software", "partials/software.html", "SoftwareCtrl"),
    RouteEntry::protected("/software/:name/install", "partials/software/install.html", "SoftwareInstallCtrl"),
    RouteEntry::protected("/plugins", "partials/plugins.html", "PluginsCtrl"),
    RouteEntry::protected("/plugins/:name", "partials/plugins/view.html", "PluginViewCtrl"),
    // cloud servers
    RouteEntry::protected("/ecs", "partials/ecs.html", "ECSCtrl"),
    RouteEntry::protected("/ecs/account", "partials/ecs/account.html", "ECSAccountCtrl"),
    RouteEntry::protected("/ecs/setting/:section", "partials/ecs/setting.html", "ECSSettingCtrl"),
    RouteEntry::protected("/ecs/:region/:instance", "partials/ecs/instance.html", "ECSInstanceCtrl"),
];
