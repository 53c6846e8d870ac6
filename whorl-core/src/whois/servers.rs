//! Where to send a query: the authoritative server for each TLD, and the
//! regional Internet registries swept for IP addresses and AS numbers.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::config::WhoisConfig;

/// ARIN, RIPE NCC, APNIC, LACNIC and AFRINIC.
pub const REGIONAL_REGISTRY_SERVERS: &[&str] = &[
    "whois.arin.net",
    "whois.ripe.net",
    "whois.apnic.net",
    "whois.lacnic.net",
    "whois.afrinic.net",
];

/// Generic TLDs.
const GENERIC_TLD_SERVERS: &[(&str, &str)] = &[
    ("aero", "whois.aero"),
    ("agency", "whois.nic.agency"),
    ("app", "whois.nic.google"),
    ("art", "whois.nic.art"),
    ("asia", "whois.nic.asia"),
    ("biz", "whois.biz"),
    ("blog", "whois.nic.blog"),
    ("cat", "whois.nic.cat"),
    ("click", "whois.nic.click"),
    ("cloud", "whois.nic.cloud"),
    ("club", "whois.nic.club"),
    ("com", "whois.verisign-grs.com"),
    ("company", "whois.nic.company"),
    ("coop", "whois.nic.coop"),
    ("dev", "whois.nic.google"),
    ("digital", "whois.nic.digital"),
    ("edu", "whois.educause.edu"),
    ("email", "whois.nic.email"),
    ("fun", "whois.nic.fun"),
    ("gov", "whois.dotgov.gov"),
    ("group", "whois.nic.group"),
    ("info", "whois.afilias.net"),
    ("int", "whois.iana.org"),
    ("jobs", "whois.nic.jobs"),
    ("life", "whois.nic.life"),
    ("link", "whois.nic.link"),
    ("live", "whois.nic.live"),
    ("llc", "whois.nic.llc"),
    ("ltd", "whois.nic.ltd"),
    ("mil", "whois.nic.mil"),
    ("mobi", "whois.afilias.net"),
    ("museum", "whois.museum"),
    ("name", "whois.nic.name"),
    ("net", "whois.verisign-grs.com"),
    ("network", "whois.nic.network"),
    ("news", "whois.nic.news"),
    ("one", "whois.nic.one"),
    ("online", "whois.nic.online"),
    ("org", "whois.pir.org"),
    ("page", "whois.nic.google"),
    ("pro", "whois.nic.pro"),
    ("shop", "whois.nic.shop"),
    ("site", "whois.nic.site"),
    ("software", "whois.nic.software"),
    ("solutions", "whois.nic.solutions"),
    ("space", "whois.nic.space"),
    ("store", "whois.nic.store"),
    ("tech", "whois.nic.tech"),
    ("tel", "whois.nic.tel"),
    ("today", "whois.nic.today"),
    ("top", "whois.nic.top"),
    ("travel", "whois.nic.travel"),
    ("vip", "whois.nic.vip"),
    ("website", "whois.nic.website"),
    ("world", "whois.nic.world"),
    ("xxx", "whois.nic.xxx"),
    ("xyz", "whois.nic.xyz"),
];

/// Country-code TLDs.
const COUNTRY_TLD_SERVERS: &[(&str, &str)] = &[
    ("ac", "whois.nic.ac"),
    ("ad", "whois.nic.ad"),
    ("ae", "whois.aeda.net.ae"),
    ("af", "whois.nic.af"),
    ("ag", "whois.nic.ag"),
    ("ai", "whois.nic.ai"),
    ("al", "whois.ripe.net"),
    ("am", "whois.amnic.net"),
    ("ao", "whois.nic.ao"),
    ("ar", "whois.nic.ar"),
    ("as", "whois.nic.as"),
    ("at", "whois.nic.at"),
    ("au", "whois.auda.org.au"),
    ("aw", "whois.nic.aw"),
    ("ax", "whois.ax"),
    ("az", "whois.nic.az"),
    ("ba", "whois.nic.ba"),
    ("bb", "whois.nic.bb"),
    ("be", "whois.dns.be"),
    ("bf", "whois.nic.bf"),
    ("bg", "whois.register.bg"),
    ("bh", "whois.nic.bh"),
    ("bi", "whois.nic.bi"),
    ("bj", "whois.nic.bj"),
    ("bn", "whois.nic.bn"),
    ("bo", "whois.nic.bo"),
    ("br", "whois.registro.br"),
    ("bt", "whois.nic.bt"),
    ("bw", "whois.nic.net.bw"),
    ("by", "whois.cctld.by"),
    ("bz", "whois.afilias-grs.info"),
    ("ca", "whois.cira.ca"),
    ("cc", "ccwhois.verisign-grs.com"),
    ("cd", "whois.nic.cd"),
    ("cf", "whois.nic.cf"),
    ("ch", "whois.nic.ch"),
    ("ci", "whois.nic.ci"),
    ("ck", "whois.nic.ck"),
    ("cl", "whois.nic.cl"),
    ("cm", "whois.netcom.cm"),
    ("cn", "whois.cnnic.cn"),
    ("co", "whois.nic.co"),
    ("cr", "whois.nic.cr"),
    ("cu", "whois.nic.cu"),
    ("cv", "whois.nic.cv"),
    ("cw", "whois.nic.cw"),
    ("cx", "whois.nic.cx"),
    ("cy", "whois.nic.cy"),
    ("cz", "whois.nic.cz"),
    ("de", "whois.denic.de"),
    ("dj", "whois.nic.dj"),
    ("dk", "whois.dk-hostmaster.dk"),
    ("dm", "whois.nic.dm"),
    ("do", "whois.nic.do"),
    ("dz", "whois.nic.dz"),
    ("ec", "whois.nic.ec"),
    ("ee", "whois.tld.ee"),
    ("eg", "whois.nic.eg"),
    ("es", "whois.nic.es"),
    ("et", "whois.nic.et"),
    ("eu", "whois.eu"),
    ("fi", "whois.fi"),
    ("fj", "whois.nic.fj"),
    ("fm", "whois.nic.fm"),
    ("fo", "whois.nic.fo"),
    ("fr", "whois.nic.fr"),
    ("ga", "whois.nic.ga"),
    ("gd", "whois.nic.gd"),
    ("ge", "whois.nic.ge"),
    ("gf", "whois.nic.gf"),
    ("gg", "whois.gg"),
    ("gh", "whois.nic.gh"),
    ("gi", "whois.nic.gi"),
    ("gl", "whois.nic.gl"),
    ("gm", "whois.nic.gm"),
    ("gn", "whois.nic.gn"),
    ("gp", "whois.nic.gp"),
    ("gq", "whois.nic.gq"),
    ("gr", "whois.nic.gr"),
    ("gs", "whois.nic.gs"),
    ("gt", "whois.nic.gt"),
    ("gu", "whois.nic.gu"),
    ("gw", "whois.nic.gw"),
    ("gy", "whois.registry.gy"),
    ("hk", "whois.hkirc.hk"),
    ("hm", "whois.registry.hm"),
    ("hn", "whois.nic.hn"),
    ("hr", "whois.dns.hr"),
    ("ht", "whois.nic.ht"),
    ("hu", "whois.nic.hu"),
    ("id", "whois.id"),
    ("ie", "whois.iedr.ie"),
    ("il", "whois.isoc.org.il"),
    ("im", "whois.nic.im"),
    ("in", "whois.registry.in"),
    ("io", "whois.nic.io"),
    ("iq", "whois.nic.iq"),
    ("ir", "whois.nic.ir"),
    ("is", "whois.isnic.is"),
    ("it", "whois.nic.it"),
    ("je", "whois.je"),
    ("jm", "whois.nic.jm"),
    ("jo", "whois.nic.jo"),
    ("jp", "whois.jprs.jp"),
    ("ke", "whois.kenic.or.ke"),
    ("kg", "whois.kg"),
    ("kh", "whois.nic.kh"),
    ("ki", "whois.nic.ki"),
    ("km", "whois.nic.km"),
    ("kn", "whois.nic.kn"),
    ("kr", "whois.kr"),
    ("kw", "whois.nic.kw"),
    ("ky", "whois.kyregistry.ky"),
    ("kz", "whois.nic.kz"),
    ("la", "whois.nic.la"),
    ("lb", "whois.nic.lb"),
    ("lc", "whois.nic.lc"),
    ("li", "whois.nic.li"),
    ("lk", "whois.nic.lk"),
    ("lr", "whois.nic.lr"),
    ("ls", "whois.nic.ls"),
    ("lt", "whois.domreg.lt"),
    ("lu", "whois.dns.lu"),
    ("lv", "whois.nic.lv"),
    ("ly", "whois.nic.ly"),
    ("ma", "whois.registre.ma"),
    ("mc", "whois.nic.mc"),
    ("md", "whois.nic.md"),
    ("me", "whois.nic.me"),
    ("mg", "whois.nic.mg"),
    ("mk", "whois.marnet.mk"),
    ("ml", "whois.nic.ml"),
    ("mm", "whois.nic.mm"),
    ("mn", "whois.nic.mn"),
    ("mo", "whois.monic.mo"),
    ("mp", "whois.nic.mp"),
    ("mq", "whois.nic.mq"),
    ("mr", "whois.nic.mr"),
    ("ms", "whois.nic.ms"),
    ("mt", "whois.nic.mt"),
    ("mu", "whois.nic.mu"),
    ("mv", "whois.nic.mv"),
    ("mw", "whois.nic.mw"),
    ("mx", "whois.mx"),
    ("my", "whois.mynic.my"),
    ("mz", "whois.nic.mz"),
    ("na", "whois.na-nic.com.na"),
    ("nc", "whois.nc"),
    ("nf", "whois.nic.nf"),
    ("ng", "whois.nic.net.ng"),
    ("ni", "whois.nic.ni"),
    ("nl", "whois.domain-registry.nl"),
    ("no", "whois.norid.no"),
    ("np", "whois.nic.np"),
    ("nr", "whois.nic.nr"),
    ("nu", "whois.iis.nu"),
    ("nz", "whois.srs.net.nz"),
    ("om", "whois.nic.om"),
    ("pa", "whois.nic.pa"),
    ("pe", "whois.nic.pe"),
    ("pf", "whois.registry.pf"),
    ("pg", "whois.nic.pg"),
    ("ph", "whois.nic.ph"),
    ("pk", "whois.pknic.net.pk"),
    ("pl", "whois.dns.pl"),
    ("pm", "whois.nic.pm"),
    ("pn", "whois.nic.pn"),
    ("pr", "whois.nic.pr"),
    ("ps", "whois.nic.ps"),
    ("pt", "whois.dns.pt"),
    ("pw", "whois.nic.pw"),
    ("py", "whois.nic.py"),
    ("qa", "whois.registry.qa"),
    ("re", "whois.nic.re"),
    ("ro", "whois.rotld.ro"),
    ("rs", "whois.rnids.rs"),
    ("ru", "whois.tcinet.ru"),
    ("rw", "whois.nic.rw"),
    ("sa", "whois.nic.net.sa"),
    ("sb", "whois.nic.sb"),
    ("sc", "whois.nic.sc"),
    ("sd", "whois.nic.sd"),
    ("se", "whois.iis.se"),
    ("sg", "whois.sgnic.sg"),
    ("sh", "whois.nic.sh"),
    ("si", "whois.register.si"),
    ("sk", "whois.sk-nic.sk"),
    ("sl", "whois.nic.sl"),
    ("sm", "whois.nic.sm"),
    ("sn", "whois.nic.sn"),
    ("so", "whois.nic.so"),
    ("sr", "whois.nic.sr"),
    ("ss", "whois.nic.ss"),
    ("st", "whois.nic.st"),
    ("su", "whois.tcinet.ru"),
    ("sv", "whois.svnet.sv"),
    ("sx", "whois.sx"),
    ("sy", "whois.nic.sy"),
    ("sz", "whois.nic.sz"),
    ("tc", "whois.nic.tc"),
    ("td", "whois.nic.td"),
    ("tf", "whois.nic.tf"),
    ("tg", "whois.nic.tg"),
    ("th", "whois.thnic.co.th"),
    ("tj", "whois.nic.tj"),
    ("tk", "whois.nic.tk"),
    ("tl", "whois.nic.tl"),
    ("tm", "whois.nic.tm"),
    ("tn", "whois.ati.tn"),
    ("to", "whois.tonic.to"),
    ("tr", "whois.trabis.gov.tr"),
    ("tt", "whois.nic.tt"),
    ("tv", "tvwhois.verisign-grs.com"),
    ("tw", "whois.twnic.net.tw"),
    ("tz", "whois.nic.tz"),
    ("ua", "whois.ua"),
    ("ug", "whois.nic.ug"),
    ("uk", "whois.nic.uk"),
    ("us", "whois.nic.us"),
    ("uy", "whois.nic.org.uy"),
    ("uz", "whois.cctld.uz"),
    ("vc", "whois.nic.vc"),
    ("ve", "whois.nic.ve"),
    ("vg", "whois.nic.vg"),
    ("vi", "whois.nic.vi"),
    ("vn", "whois.nic.vn"),
    ("vu", "whois.nic.vu"),
    ("wf", "whois.nic.wf"),
    ("ws", "whois.website.ws"),
    ("ye", "whois.nic.ye"),
    ("yt", "whois.nic.yt"),
    ("za", "whois.registry.net.za"),
    ("zm", "whois.nic.zm"),
    ("zw", "whois.nic.zw"),
];

static TLD_SERVERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    GENERIC_TLD_SERVERS
        .iter()
        .chain(COUNTRY_TLD_SERVERS)
        .copied()
        .collect()
});

/// The built-in server for `tld`, ignoring any configured overrides.
pub fn default_server_for_tld(tld: &str) -> Option<&'static str> {
    TLD_SERVERS.get(tld.to_ascii_lowercase().as_str()).copied()
}

/// TLD and regional-registry lookup with optional per-TLD overrides.
#[derive(Debug, Clone)]
pub struct ServerDirectory {
    overrides: HashMap<String, String>,
    regional: Vec<String>,
}

impl Default for ServerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerDirectory {
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            regional: REGIONAL_REGISTRY_SERVERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &WhoisConfig) -> Self {
        let mut directory = Self::new().with_regional_servers(config.regional_servers.clone());
        for (tld, server) in &config.tld_servers {
            directory = directory.with_tld_server(tld, server);
        }
        directory
    }

    pub fn with_tld_server(mut self, tld: &str, server: &str) -> Self {
        self.overrides
            .insert(tld.to_ascii_lowercase(), server.to_string());
        self
    }

    /// Replace the regional registry list. An empty list keeps the current one.
    pub fn with_regional_servers(mut self, servers: Vec<String>) -> Self {
        if !servers.is_empty() {
            self.regional = servers;
        }
        self
    }

    pub fn server_for_tld(&self, tld: &str) -> Option<&str> {
        let tld = tld.to_ascii_lowercase();
        self.overrides
            .get(&tld)
            .map(String::as_str)
            .or_else(|| TLD_SERVERS.get(tld.as_str()).copied())
    }

    pub fn regional_registry_servers(&self) -> &[String] {
        &self.regional
    }
}
